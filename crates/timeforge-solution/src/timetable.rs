//! Per-resource occupancy of times.
//!
//! A task occupies its resource at every time of its meet once both the
//! resource and the meet's time are known. Resource monitors are driven by
//! the occupancy changes reported here.

/// One occupancy change at one time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancyChange {
    pub time: usize,
    pub old: u32,
    pub new: u32,
}

impl OccupancyChange {
    /// The resource went from free to busy.
    #[inline]
    pub fn became_busy(&self) -> bool {
        self.old == 0 && self.new > 0
    }

    /// The resource went from busy to free.
    #[inline]
    pub fn became_free(&self) -> bool {
        self.old > 0 && self.new == 0
    }
}

/// Occupancy counts, one row per resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    cycle_len: usize,
    occupancy: Vec<Vec<u32>>,
}

impl Timetable {
    pub fn new(resource_count: usize, cycle_len: usize) -> Self {
        Self {
            cycle_len,
            occupancy: vec![vec![0; cycle_len]; resource_count],
        }
    }

    /// Number of tasks occupying `resource` at `time`.
    #[inline]
    pub fn occupancy(&self, resource: usize, time: usize) -> u32 {
        self.occupancy[resource][time]
    }

    /// Occupancy row of one resource.
    #[inline]
    pub fn row(&self, resource: usize) -> &[u32] {
        &self.occupancy[resource]
    }

    /// Times at which `resource` is busy.
    pub fn busy_times(&self, resource: usize) -> impl Iterator<Item = usize> + '_ {
        self.occupancy[resource]
            .iter()
            .enumerate()
            .filter(|(_, &n)| n > 0)
            .map(|(t, _)| t)
    }

    /// Occupies `resource` for `duration` times from `start`.
    pub(crate) fn add(
        &mut self,
        resource: usize,
        start: usize,
        duration: usize,
    ) -> Vec<OccupancyChange> {
        self.change(resource, start, duration, true)
    }

    /// Frees `resource` for `duration` times from `start`.
    pub(crate) fn remove(
        &mut self,
        resource: usize,
        start: usize,
        duration: usize,
    ) -> Vec<OccupancyChange> {
        self.change(resource, start, duration, false)
    }

    fn change(
        &mut self,
        resource: usize,
        start: usize,
        duration: usize,
        add: bool,
    ) -> Vec<OccupancyChange> {
        assert!(
            start + duration <= self.cycle_len,
            "times {}..{} leave the cycle",
            start,
            start + duration
        );
        let row = &mut self.occupancy[resource];
        (start..start + duration)
            .map(|time| {
                let old = row[time];
                let new = if add {
                    old + 1
                } else {
                    old.checked_sub(1)
                        .unwrap_or_else(|| panic!("resource {} not busy at {}", resource, time))
                };
                row[time] = new;
                OccupancyChange { time, old, new }
            })
            .collect()
    }
}
