/// Binary compliance classification of one execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Compliant,
    NonCompliant { marker_count: u64 },
}

impl Verdict {
    /// Strict zero/non-zero threshold: any marker makes the run non-compliant.
    pub fn from_marker_count(marker_count: u64) -> Self {
        if marker_count == 0 {
            Verdict::Compliant
        } else {
            Verdict::NonCompliant { marker_count }
        }
    }

    pub fn is_compliant(&self) -> bool {
        matches!(self, Verdict::Compliant)
    }

    pub fn marker_count(&self) -> u64 {
        match self {
            Verdict::Compliant => 0,
            Verdict::NonCompliant { marker_count } => *marker_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_compliant_and_one_is_not() {
        assert!(Verdict::from_marker_count(0).is_compliant());
        assert_eq!(
            Verdict::from_marker_count(1),
            Verdict::NonCompliant { marker_count: 1 }
        );
        assert_eq!(Verdict::from_marker_count(u64::MAX).marker_count(), u64::MAX);
    }
}
