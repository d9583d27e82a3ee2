//! End-to-end extraction: read, select, write both outputs.

use crate::error::Result;
use crate::pipeline::ExtractConfig;
use crate::select::{select_extremes_from_path, Extremes};
use std::path::Path;

/// Run one extraction.
///
/// Both selections are computed and both outputs fully written to temporary
/// files before either is renamed into place. A failure while reading,
/// ranking or writing leaves no new output behind: if the second rename
/// fails, the first output is removed again. A file that already existed at
/// the negative output path is not restored.
///
/// # Arguments
/// * `input` - Tab-delimited results table
/// * `negative_output` - Destination for the negative selection
/// * `positive_output` - Destination for the positive selection
/// * `config` - Extraction parameters
pub fn run_extraction(
    input: &Path,
    negative_output: &Path,
    positive_output: &Path,
    config: &ExtractConfig,
) -> Result<Extremes> {
    config.validate()?;

    log::info!("Loading results table from {:?}...", input);
    let extremes = select_extremes_from_path(input, config)?;
    log::info!(
        "Ranked {} of {} features",
        extremes.n_ranked,
        extremes.n_features
    );

    let staged_negative = extremes.negative.stage_csv(negative_output)?;
    let staged_positive = extremes.positive.stage_csv(positive_output)?;

    log::info!(
        "Writing {} negative features to {:?}",
        extremes.negative.len(),
        negative_output
    );
    staged_negative.persist(negative_output)?;
    log::info!(
        "Writing {} positive features to {:?}",
        extremes.positive.len(),
        positive_output
    );
    if let Err(e) = staged_positive.persist(positive_output) {
        if let Err(cleanup) = std::fs::remove_file(negative_output) {
            log::warn!("Could not remove {:?}: {}", negative_output, cleanup);
        }
        return Err(e.into());
    }

    Ok(extremes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_run_extraction_writes_both() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("results.tsv");
        let mut file = std::fs::File::create(&input).unwrap();
        writeln!(file, "\tbaseMean\tlog2FoldChange\tlfcSE").unwrap();
        writeln!(file, "X\t10\t2.0\t0.1").unwrap();
        writeln!(file, "Y\t20\t-3.0\t0.2").unwrap();
        writeln!(file, "Z\t30\t0.5\t5.0").unwrap();
        drop(file);

        let neg = dir.path().join("neg.csv");
        let pos = dir.path().join("pos.csv");
        let extremes = run_extraction(&input, &neg, &pos, &ExtractConfig::default()).unwrap();

        assert_eq!(extremes.n_features, 3);
        assert_eq!(
            std::fs::read_to_string(&neg).unwrap(),
            ",Unnamed: 0\n1,Y\n0,X\n2,Z\n"
        );
        assert_eq!(
            std::fs::read_to_string(&pos).unwrap(),
            ",Unnamed: 0\n0,X\n1,Y\n2,Z\n"
        );
    }

    #[test]
    fn test_failed_second_output_removes_first() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("results.tsv");
        std::fs::write(&input, "\tlog2FoldChange\tlfcSE\nX\t2.0\t0.1\n").unwrap();

        // A directory in the way of the positive output makes its rename fail
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        let neg = out.join("neg.csv");
        let pos = out.join("blocked");
        std::fs::create_dir(&pos).unwrap();
        std::fs::write(pos.join("keep"), "x").unwrap();

        let err = run_extraction(&input, &neg, &pos, &ExtractConfig::default()).unwrap_err();
        assert_eq!(err.class(), crate::error::ErrorClass::Io);
        assert!(!neg.exists());
        // Only the blocking directory remains; staged files are cleaned up
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 1);
    }

    #[test]
    fn test_invalid_config_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let neg = dir.path().join("neg.csv");
        let pos = dir.path().join("pos.csv");
        let config = ExtractConfig::new().z(-1.0);
        assert!(run_extraction(&dir.path().join("missing.tsv"), &neg, &pos, &config).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
