/// Hands out increasing ticket numbers for one kind of async call so a
/// response can be checked against the most recent request before it is
/// allowed to touch state.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.latest
    }
}
