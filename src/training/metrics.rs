//! Hold-out evaluation: accuracy, macro F1, per-class report, confusion matrix

use crate::error::{PremiumError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confusion matrix, rows = true class, columns = predicted class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn compute(y_true: &[usize], y_pred: &[usize], labels: &[String]) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(PremiumError::ShapeError {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }
        let n = labels.len();
        let mut counts = vec![vec![0; n]; n];
        for (&t, &p) in y_true.iter().zip(y_pred) {
            if t >= n || p >= n {
                return Err(PremiumError::ValidationError(format!(
                    "class index out of range for {} labels",
                    n
                )));
            }
            counts[t][p] += 1;
        }
        Ok(Self {
            labels: labels.to_vec(),
            counts,
        })
    }

    fn true_positives(&self, c: usize) -> usize {
        self.counts[c][c]
    }

    /// Rows whose true class is `c`
    fn support(&self, c: usize) -> usize {
        self.counts[c].iter().sum()
    }

    /// Rows predicted as `c`
    fn predicted(&self, c: usize) -> usize {
        self.counts.iter().map(|row| row[c]).sum()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .labels
            .iter()
            .map(|l| l.len())
            .chain(self.counts.iter().flatten().map(|c| c.to_string().len()))
            .max()
            .unwrap_or(1)
            .max(4);

        write!(f, "{:>width$}", "", width = width)?;
        for label in &self.labels {
            write!(f, " {:>width$}", label, width = width)?;
        }
        writeln!(f)?;
        for (label, row) in self.labels.iter().zip(&self.counts) {
            write!(f, "{:>width$}", label, width = width)?;
            for c in row {
                write!(f, " {:>width$}", c, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Precision, recall, F1 and support for one class or average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScores {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class scores plus macro and weighted averages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassScores>,
    pub accuracy: f64,
    pub macro_avg: ClassScores,
    pub weighted_avg: ClassScores,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl ClassificationReport {
    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let classes: Vec<ClassScores> = cm
            .labels
            .iter()
            .enumerate()
            .map(|(c, label)| {
                let tp = cm.true_positives(c);
                let precision = ratio(tp, cm.predicted(c));
                let recall = ratio(tp, cm.support(c));
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassScores {
                    label: label.clone(),
                    precision,
                    recall,
                    f1,
                    support: cm.support(c),
                }
            })
            .collect();

        let total = cm.total();
        let n = classes.len().max(1) as f64;
        let macro_avg = ClassScores {
            label: "macro avg".to_string(),
            precision: classes.iter().map(|s| s.precision).sum::<f64>() / n,
            recall: classes.iter().map(|s| s.recall).sum::<f64>() / n,
            f1: classes.iter().map(|s| s.f1).sum::<f64>() / n,
            support: total,
        };
        let weighted = |get: fn(&ClassScores) -> f64| {
            if total == 0 {
                0.0
            } else {
                classes.iter().map(|s| get(s) * s.support as f64).sum::<f64>() / total as f64
            }
        };
        let weighted_avg = ClassScores {
            label: "weighted avg".to_string(),
            precision: weighted(|s| s.precision),
            recall: weighted(|s| s.recall),
            f1: weighted(|s| s.f1),
            support: total,
        };

        let correct: usize = (0..cm.labels.len()).map(|c| cm.true_positives(c)).sum();

        Self {
            classes,
            accuracy: ratio(correct, total),
            macro_avg,
            weighted_avg,
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|s| s.label.len())
            .max()
            .unwrap_or(0)
            .max("weighted avg".len());

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support",
            width = width
        )?;
        writeln!(f)?;
        for s in &self.classes {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                s.label, s.precision, s.recall, s.f1, s.support,
                width = width
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support,
            width = width
        )?;
        for s in [&self.macro_avg, &self.weighted_avg] {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                s.label, s.precision, s.recall, s.f1, s.support,
                width = width
            )?;
        }
        Ok(())
    }
}

/// Evaluation stored with the model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub accuracy: f64,
    pub f1_macro: f64,
    pub report: ClassificationReport,
    pub confusion_matrix: ConfusionMatrix,
    pub n_train: usize,
    pub n_test: usize,
}

impl EvaluationSummary {
    pub fn compute(
        y_true: &[usize],
        y_pred: &[usize],
        labels: &[String],
        n_train: usize,
    ) -> Result<Self> {
        let confusion_matrix = ConfusionMatrix::compute(y_true, y_pred, labels)?;
        let report = ClassificationReport::from_confusion(&confusion_matrix);
        Ok(Self {
            accuracy: report.accuracy,
            f1_macro: report.macro_avg.f1,
            report,
            confusion_matrix,
            n_train,
            n_test: y_true.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        vec!["High".into(), "Low".into(), "Medium".into()]
    }

    #[test]
    fn test_confusion_matrix() {
        let y_true = [0, 0, 1, 1, 2, 2];
        let y_pred = [0, 1, 1, 1, 2, 0];
        let cm = ConfusionMatrix::compute(&y_true, &y_pred, &labels()).unwrap();
        assert_eq!(cm.counts, vec![vec![1, 1, 0], vec![0, 2, 0], vec![1, 0, 1]]);
        assert_eq!(cm.total(), 6);
    }

    #[test]
    fn test_report_scores() {
        let y_true = [0, 0, 1, 1, 2, 2];
        let y_pred = [0, 1, 1, 1, 2, 0];
        let summary = EvaluationSummary::compute(&y_true, &y_pred, &labels(), 20).unwrap();

        assert!((summary.accuracy - 4.0 / 6.0).abs() < 1e-12);
        let low = &summary.report.classes[1];
        assert!((low.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((low.recall - 1.0).abs() < 1e-12);
        assert!((low.f1 - 0.8).abs() < 1e-12);

        // macro F1 = mean(0.5, 0.8, 2/3)
        let expected = (0.5 + 0.8 + 2.0 / 3.0) / 3.0;
        assert!((summary.f1_macro - expected).abs() < 1e-12);
        assert_eq!(summary.n_test, 6);
    }

    #[test]
    fn test_absent_prediction_scores_zero() {
        let cm = ConfusionMatrix::compute(&[0, 1], &[0, 0], &labels()[..2]).unwrap();
        let report = ClassificationReport::from_confusion(&cm);
        assert_eq!(report.classes[1].precision, 0.0);
        assert_eq!(report.classes[1].f1, 0.0);
    }

    #[test]
    fn test_display() {
        let cm = ConfusionMatrix::compute(&[0, 1, 2], &[0, 1, 1], &labels()).unwrap();
        let text = ClassificationReport::from_confusion(&cm).to_string();
        assert!(text.contains("precision"));
        assert!(text.contains("weighted avg"));
        assert!(cm.to_string().lines().count() == 4);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(ConfusionMatrix::compute(&[0, 1], &[0], &labels()).is_err());
    }
}
