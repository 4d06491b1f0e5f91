//! Rendering rankings as text lines or JSON.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::scoring::{RankedLink, Ranking};

/// Output encoding for rankings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `u v score` lines with 12 decimals.
    #[default]
    Text,
    /// One pretty-printed JSON document per ranking.
    Json,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

/// Formats one entry as `u v score`, followed by the convergence marker when
/// present.
pub fn format_entry(entry: &RankedLink) -> String {
    let link = &entry.link;
    match entry.convergence {
        Some(convergence) => format!(
            "{} {} {:.12} {}",
            link.u,
            link.v,
            link.score,
            convergence.marker()
        ),
        None => format!("{} {} {:.12}", link.u, link.v, link.score),
    }
}

/// Writes `ranking` to `writer`.
pub fn write_ranking<W: Write>(writer: &mut W, ranking: &Ranking, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for entry in &ranking.entries {
                writeln!(writer, "{}", format_entry(entry))?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, ranking).map_err(io::Error::from)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Path the ranking for `ranking.metric` is written to inside `dir`.
pub fn ranking_path(dir: &Path, ranking: &Ranking, format: OutputFormat) -> PathBuf {
    dir.join(ranking.metric.default_file_name())
        .with_extension(format.extension())
}

/// Writes `ranking` into its per-metric file inside `dir`, creating `dir` if
/// needed. Returns the file path.
pub fn write_ranking_file(dir: &Path, ranking: &Ranking, format: OutputFormat) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = ranking_path(dir, ranking, format);
    let mut writer = BufWriter::new(File::create(&path)?);
    write_ranking(&mut writer, ranking, format)?;
    info!(
        metric = ranking.metric.name(),
        entries = ranking.entries.len(),
        path = %path.display(),
        "output.ranking.written"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Convergence, Metric};
    use crate::topk::Link;

    fn sample(metric: Metric, convergence: Option<Convergence>) -> Ranking {
        Ranking {
            metric,
            entries: vec![
                RankedLink {
                    link: Link::new(1, 3, 0.5),
                    convergence,
                },
                RankedLink {
                    link: Link::new(1, 4, -0.125),
                    convergence: convergence.map(|_| Convergence::NotConverged),
                },
            ],
            converged_pairs: None,
        }
    }

    #[test]
    fn text_lines_have_twelve_decimals() {
        let mut buf = Vec::new();
        write_ranking(&mut buf, &sample(Metric::Jaccard, None), OutputFormat::Text).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "1 3 0.500000000000\n1 4 -0.125000000000\n"
        );
    }

    #[test]
    fn convergence_column_is_appended() {
        let ranking = sample(
            Metric::CommuteTimeConverged,
            Some(Convergence::Converged { iteration: 4 }),
        );
        let mut buf = Vec::new();
        write_ranking(&mut buf, &ranking, OutputFormat::Text).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "1 3 0.500000000000 4\n1 4 -0.125000000000 -1\n"
        );
    }

    #[test]
    fn json_output_is_parseable() {
        let mut buf = Vec::new();
        write_ranking(&mut buf, &sample(Metric::Katz, None), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["metric"], "katz");
        assert_eq!(value["entries"][0]["u"], 1);
        assert_eq!(value["entries"][0]["v"], 3);
        assert_eq!(value["entries"][1]["score"], -0.125);
        assert!(value["entries"][0].get("convergence").is_none());
    }

    #[test]
    fn files_are_named_per_metric() {
        let dir = tempfile::tempdir().unwrap();
        let ranking = sample(Metric::CommuteTime, None);
        let path = write_ranking_file(&dir.path().join("out"), &ranking, OutputFormat::Text).unwrap();
        assert!(path.ends_with("HittingTime.txt"));
        assert!(fs::read_to_string(&path).unwrap().starts_with("1 3 0.5"));

        let json = ranking_path(dir.path(), &ranking, OutputFormat::Json);
        assert!(json.ends_with("HittingTime.json"));
    }
}
