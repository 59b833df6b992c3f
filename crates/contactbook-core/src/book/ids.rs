//! Identifier assignment

/// Issues identifiers derived from the millisecond clock
///
/// Every identifier is strictly greater than the previous one issued, so a
/// burst of creations within the same millisecond still gets distinct
/// values, and an identifier that was deleted is never handed out again.
#[derive(Debug, Clone, Default)]
pub(crate) struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Start above every numeric identifier already in use
    pub(crate) fn starting_after<'a>(existing: impl IntoIterator<Item = &'a str>) -> Self {
        let last = existing
            .into_iter()
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self { last }
    }

    /// Next identifier; `taken` guards against non-numeric collisions
    pub(crate) fn next(&mut self, taken: impl Fn(&str) -> bool) -> String {
        let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        let mut candidate = now.max(self.last.saturating_add(1));

        while taken(&candidate.to_string()) {
            candidate = candidate.saturating_add(1);
        }

        self.last = candidate;
        candidate.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_strictly_increase() {
        let mut ids = IdGenerator::default();
        let first: u64 = ids.next(|_| false).parse().unwrap();
        let second: u64 = ids.next(|_| false).parse().unwrap();
        let third: u64 = ids.next(|_| false).parse().unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn starts_after_existing_ids() {
        let far_future = "99999999999999";
        let mut ids = IdGenerator::starting_after(["1", "abc", far_future]);
        assert_eq!(ids.next(|_| false), "100000000000000");
    }

    #[test]
    fn skips_taken_ids() {
        let mut ids = IdGenerator::starting_after(["99999999999999"]);
        let id = ids.next(|candidate| candidate == "100000000000000");
        assert_eq!(id, "100000000000001");
    }
}
