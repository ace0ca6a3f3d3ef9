//! Collected outcomes of an experiment.

use crate::error::{AnalysisError, ExecutionError};
use crate::executor::RunReport;
use crate::stats::{compare_samples, NamedSample, NormalityTestKind, RunStatisticSummary, StatisticalComparisonTest};

/// One run of one contender.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub contender: String,
    pub repetition: usize,
    pub seed: u64,
    pub outcome: Result<RunReport, ExecutionError>,
}

impl RunRecord {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Every run of an experiment, ordered by contender then repetition.
#[derive(Debug, Clone)]
pub struct ExperimentResults {
    contenders: Vec<String>,
    records: Vec<RunRecord>,
}

impl ExperimentResults {
    pub(crate) fn new(contenders: Vec<String>, mut records: Vec<RunRecord>) -> Self {
        records.sort_by_key(|r| {
            let index = contenders.iter().position(|c| *c == r.contender);
            (index, r.repetition)
        });
        Self { contenders, records }
    }

    /// Contender names in registration order.
    pub fn contenders(&self) -> &[String] {
        &self.contenders
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    /// Runs of `contender`.
    pub fn runs<'a>(&'a self, contender: &'a str) -> impl Iterator<Item = &'a RunRecord> + 'a {
        self.records.iter().filter(move |r| r.contender == contender)
    }

    /// Failed runs with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&RunRecord, &ExecutionError)> {
        self.records
            .iter()
            .filter_map(|r| r.outcome.as_ref().err().map(|e| (r, e)))
    }

    pub fn success_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_success()).count()
    }

    /// Per-contender values of the probe observation named `statistic`.
    ///
    /// Failed runs and runs without that observation are skipped, so
    /// samples may differ in size.
    pub fn samples(&self, statistic: &str) -> Vec<NamedSample> {
        self.contenders
            .iter()
            .map(|contender| {
                let values = self
                    .runs(contender)
                    .filter_map(|r| r.outcome.as_ref().ok())
                    .filter_map(|report| report.observation(statistic))
                    .collect();
                NamedSample::new(contender.clone(), values)
            })
            .collect()
    }

    /// Calculated summaries of `statistic`, one per contender.
    pub fn summaries(&self, statistic: &str) -> Result<Vec<RunStatisticSummary>, AnalysisError> {
        self.samples(statistic)
            .into_iter()
            .map(|sample| {
                let mut summary = RunStatisticSummary::new(sample.name(), statistic, sample.values().to_vec());
                summary.calculate()?;
                Ok(summary)
            })
            .collect()
    }

    /// Compares the contenders on `statistic` with the test chosen by
    /// [`compare_samples`].
    pub fn compare(
        &self,
        statistic: &str,
        normality: NormalityTestKind,
    ) -> Result<StatisticalComparisonTest, AnalysisError> {
        compare_samples(&self.samples(statistic), normality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use std::time::Duration;

    fn record(contender: &str, repetition: usize, best: Option<f64>) -> RunRecord {
        let outcome = match best {
            Some(score) => Ok(RunReport {
                algorithm: contender.into(),
                problem: "p".into(),
                seed: repetition as u64,
                evaluations: 10,
                epochs: 10,
                elapsed: Duration::from_millis(1),
                observations: vec![("best score".into(), Some(score))],
            }),
            None => Err(ExecutionError::Config(ConfigError::NoStopCondition("p".into()))),
        };
        RunRecord {
            contender: contender.into(),
            repetition,
            seed: repetition as u64,
            outcome,
        }
    }

    #[test]
    fn test_records_ordered_by_contender_then_repetition() {
        let results = ExperimentResults::new(
            vec!["b".into(), "a".into()],
            vec![record("a", 1, Some(1.0)), record("b", 1, Some(2.0)), record("a", 0, Some(3.0)), record("b", 0, None)],
        );
        let order: Vec<(&str, usize)> = results
            .records()
            .iter()
            .map(|r| (r.contender.as_str(), r.repetition))
            .collect();
        assert_eq!(order, vec![("b", 0), ("b", 1), ("a", 0), ("a", 1)]);
    }

    #[test]
    fn test_samples_skip_failures() {
        let results = ExperimentResults::new(
            vec!["a".into(), "b".into()],
            vec![record("a", 0, Some(1.0)), record("a", 1, None), record("b", 0, Some(5.0))],
        );
        let samples = results.samples("best score");
        assert_eq!(samples[0].values(), &[1.0]);
        assert_eq!(samples[1].values(), &[5.0]);
        assert_eq!(results.failures().count(), 1);
        assert_eq!(results.success_count(), 2);
        assert!(results.samples("missing").iter().all(NamedSample::is_empty));
    }

    #[test]
    fn test_summaries_and_empty_sample() {
        let results = ExperimentResults::new(
            vec!["a".into(), "b".into()],
            vec![record("a", 0, Some(1.0)), record("a", 1, Some(3.0)), record("b", 0, None)],
        );
        assert!(matches!(
            results.summaries("best score"),
            Err(AnalysisError::InsufficientSample { actual: 0, .. })
        ));

        let results = ExperimentResults::new(
            vec!["a".into()],
            vec![record("a", 0, Some(1.0)), record("a", 1, Some(3.0))],
        );
        let summaries = results.summaries("best score").unwrap();
        assert!((summaries[0].stats().unwrap().mean - 2.0).abs() < 1e-12);
    }
}
