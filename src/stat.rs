use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub searches: usize,
    pub expanded_nodes: usize,
    pub relaxed_arcs: usize,
    pub stale_entries: usize,
    pub path_writes: usize,
    pub time_us: usize,
    pub cost: u64,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Searches {:?} Cost {:?} Time(microseconds) {:?} Expanded nodes: {:?} Relaxed arcs: {:?} Stale entries: {:?} Path writes: {:?}",
            self.searches,
            self.cost,
            self.time_us,
            self.expanded_nodes,
            self.relaxed_arcs,
            self.stale_entries,
            self.path_writes
        );
    }
}
