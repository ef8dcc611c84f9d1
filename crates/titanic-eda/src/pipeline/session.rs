use super::EdaStage;
use crate::cleaner::DatasetCleaner;
use crate::config::EdaConfig;
use crate::error::{EdaError, Result, ResultExt};
use crate::loader::load_csv;
use crate::locator::{self, DatasetPaths, candidate_dirs, locate_files};
use crate::plots::PlotRenderer;
use crate::reporting::{EdaReport, KEY_INSIGHTS, console, timestamp};
use crate::stats::{
    correlation_matrix, describe, group_rates, null_counts, total_nulls, value_counts,
};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// One end-to-end run over the Titanic files.
///
/// Console sections go to the writer passed to [`EdaSession::run`]; logs go
/// through `tracing`.
pub struct EdaSession {
    config: EdaConfig,
}

impl EdaSession {
    pub fn new(config: EdaConfig) -> Self {
        Self { config }
    }

    fn enter(&self, stage: EdaStage) {
        if stage.is_terminal() {
            debug!("Session reached stage: {}", stage);
        } else {
            info!("{}", stage);
        }
    }

    /// Candidate directories for this run, in search order.
    pub fn candidates(&self) -> Result<Vec<PathBuf>> {
        let working_dir = match &self.config.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        let program_dir = match &self.config.program_dir {
            Some(dir) => dir.clone(),
            None => locator::program_dir()?,
        };

        Ok(candidate_dirs(
            &working_dir,
            &program_dir,
            &self.config.data_dir_name,
        ))
    }

    /// Run every stage. Stops before loading anything when either input file
    /// is missing, after printing the searched locations.
    pub fn run(&self, out: &mut dyn Write) -> Result<EdaReport> {
        let result = self.run_stages(out);
        if result.is_err() {
            self.enter(EdaStage::Failed);
        }
        result
    }

    fn locate(&self, out: &mut dyn Write) -> Result<DatasetPaths> {
        console::write_search_header(out)?;

        let candidates = self.candidates()?;
        match locate_files(&candidates, &self.config.train_file, &self.config.test_file) {
            Ok(paths) => {
                console::write_found_files(out, &paths)?;
                Ok(paths)
            }
            Err(e) => {
                if let EdaError::MissingInputFiles { searched, .. } = &e {
                    console::write_missing_files(
                        out,
                        &self.config.train_file,
                        &self.config.test_file,
                        searched,
                    )?;
                }
                Err(e)
            }
        }
    }

    fn run_stages(&self, out: &mut dyn Write) -> Result<EdaReport> {
        let started = Instant::now();
        let cfg = &self.config;

        self.enter(EdaStage::Locating);
        let paths = self.locate(out)?;

        self.enter(EdaStage::Loading);
        let train = load_csv(&paths.train).context("Loading train data")?;
        let test = load_csv(&paths.test).context("Loading test data")?;

        self.enter(EdaStage::Inspecting);
        console::write_info(out, &train)?;
        console::write_head(out, &train, cfg.head_rows)?;
        let missing_before = null_counts(&train);
        console::write_missing_before(out, &missing_before)?;

        self.enter(EdaStage::Cleaning);
        let train_shape_before = train.shape();
        let test_shape_before = test.shape();
        let (train, train_report) = DatasetCleaner::clean_train(train)?;
        let (test, test_report) = DatasetCleaner::clean_test(test)?;
        for action in train_report.actions.iter().chain(&test_report.actions) {
            info!("  {}", action);
        }
        let missing_after = null_counts(&train);
        info!(
            "Missing cells in train: {} -> {}",
            missing_before.iter().map(|c| c.nulls).sum::<usize>(),
            total_nulls(&train)
        );
        console::write_missing_after(out, &missing_after)?;

        self.enter(EdaStage::Summarizing);
        let summary = describe(&train)?;
        console::write_describe(out, &summary)?;
        let survival_counts = value_counts(&train, "Survived")?;
        console::write_value_counts(out, "Survived", &survival_counts)?;
        let by_sex = group_rates(&train, "Sex", "Survived")?;
        let by_class = group_rates(&train, "Pclass", "Survived")?;
        console::write_group_rates(
            out,
            &[("Sex", by_sex.as_slice()), ("Pclass", by_class.as_slice())],
        )?;
        let correlation = correlation_matrix(&train)?;

        self.enter(EdaStage::Plotting);
        let plots = if cfg.render_plots {
            PlotRenderer::new(&cfg.output_dir, cfg.histogram_bins).render_all(&train)
        } else {
            info!("Plot rendering disabled");
            Vec::new()
        };

        self.enter(EdaStage::Reporting);
        console::write_insights(out)?;
        console::write_completed(out)?;
        out.flush()?;

        self.enter(EdaStage::Complete);
        info!("EDA finished in {} ms", started.elapsed().as_millis());

        Ok(EdaReport {
            generated_at: timestamp(),
            train_file: paths.train.display().to_string(),
            test_file: paths.test.display().to_string(),
            train_shape_before,
            train_shape_after: train.shape(),
            test_shape_before,
            test_shape_after: test.shape(),
            missing_before,
            missing_after,
            cleaning: vec![train_report, test_report],
            summary_statistics: summary,
            survival_counts,
            survival_by_sex: by_sex,
            survival_by_class: by_class,
            correlation,
            plots: plots.iter().map(|p| p.display().to_string()).collect(),
            insights: KEY_INSIGHTS.iter().map(|s| s.to_string()).collect(),
        })
    }
}
