use crate::verdict::Verdict;
use raidguard_types::{Finding, Observation};

/// Observation and findings built for one verdict.
#[derive(Clone, Debug)]
pub struct Assessment {
    pub verdict: Verdict,
    pub observations: Vec<Observation>,
    pub findings: Vec<Finding>,
}
