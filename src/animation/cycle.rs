/// The fixed, ordered list of clips the switch button walks through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipCycle {
    names: Vec<String>,
}

impl ClipCycle {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The clip following `current`.
    ///
    /// The successor of the last clip is the first one. A clip that is not part
    /// of the cycle, or no clip at all, is followed by the first clip. Returns
    /// `None` only when the cycle is empty.
    ///
    /// # Example
    /// ```
    /// # use clipview::animation::ClipCycle;
    /// let cycle = ClipCycle::default();
    /// assert_eq!(cycle.next(Some("CatWalk")), Some("Samba"));
    /// assert_eq!(cycle.next(Some("Belly")), Some("CatWalk"));
    /// ```
    pub fn next(&self, current: Option<&str>) -> Option<&str> {
        if self.names.is_empty() {
            return None;
        }

        let next = current
            .and_then(|c| self.names.iter().position(|n| n == c))
            .map_or(0, |i| (i + 1) % self.names.len());
        Some(&self.names[next])
    }
}

impl Default for ClipCycle {
    fn default() -> Self {
        Self::new(["CatWalk", "Samba", "Belly"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_the_list_and_wraps() {
        let cycle = ClipCycle::default();
        let mut current = Some("CatWalk");
        let mut seen = Vec::new();
        for _ in 0..4 {
            current = cycle.next(current);
            seen.push(current.unwrap());
        }
        assert_eq!(seen, ["Samba", "Belly", "CatWalk", "Samba"]);
    }

    #[test]
    fn unknown_or_missing_current_restarts() {
        let cycle = ClipCycle::default();
        assert_eq!(cycle.next(None), Some("CatWalk"));
        assert_eq!(cycle.next(Some("Dance")), Some("CatWalk"));
        assert_eq!(cycle.next(Some("catwalk")), Some("CatWalk"));
    }

    #[test]
    fn empty_cycle_has_no_next() {
        let cycle = ClipCycle::new(Vec::<String>::new());
        assert_eq!(cycle.next(Some("Samba")), None);
    }

    #[test]
    fn single_clip_cycles_to_itself() {
        let cycle = ClipCycle::new(["Idle"]);
        assert_eq!(cycle.next(Some("Idle")), Some("Idle"));
    }
}
