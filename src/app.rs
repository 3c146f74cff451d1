use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::{ConfigError, SatelliteConfig};
use crate::predict::{
    refresh_tle_cache, OrbitNumbering, OrbitalStateProvider, PassEventFinder, PredictError,
    SatelliteRecord, Sgp4Predictor, TleLoader,
};
use crate::report::{self, ReportContext, ReportError};
use crate::search::{
    parse_aoi_list, search_passes, AreaOfInterest, Pass, SearchError, SearchOptions, SearchWindow,
};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("predict error: {0}")]
    Predict(#[from] PredictError),
    #[error("search error: {0}")]
    Search(#[from] SearchError),
    #[error("report error: {0}")]
    Report(#[from] ReportError),
    #[error("AOI file {path}: {source}")]
    AoiFile {
        path: String,
        source: std::io::Error,
    },
    #[error("search worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone)]
pub struct InputPaths {
    pub satellite_config: PathBuf,
    pub aoi_file: PathBuf,
    pub tle_file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub inputs: InputPaths,
    pub tle_url: String,
    pub tle_max_age: Duration,
    pub window: SearchWindow,
    pub options: SearchOptions,
    pub template_html: PathBuf,
    pub placeholder: String,
    pub output_html: PathBuf,
    pub output_json: Option<PathBuf>,
}

/// Everything a search needs, validated up front.
#[derive(Debug)]
pub struct Inputs {
    pub satellites: Vec<Arc<SatelliteRecord>>,
    pub aois: Vec<AreaOfInterest>,
}

pub fn load_aois(path: &Path) -> Result<Vec<AreaOfInterest>, RunError> {
    let content = std::fs::read_to_string(path).map_err(|source| RunError::AoiFile {
        path: path.display().to_string(),
        source,
    })?;
    let aois = parse_aoi_list(&content)?;
    for aoi in &aois {
        log::info!("{}", aoi);
    }
    Ok(aois)
}

/// Build records for every configured satellite found in the element set.
pub fn load_satellites(
    loader: &TleLoader,
    config: &SatelliteConfig,
) -> Result<Vec<SatelliteRecord>, RunError> {
    config.validate()?;

    let selected = loader.select(&config.satellites);
    for label in &config.satellites {
        if !selected.iter().any(|(found, _)| *found == label.as_str()) {
            log::warn!(
                "Satellite {:?} not found in {}",
                label,
                loader.path().display()
            );
        }
    }

    let mut records = Vec::with_capacity(selected.len());
    for (label, entry) in selected {
        let name = config.display_name(label)?;
        let offset = config.orbit_offset(name)?;
        let record = SatelliteRecord::from_tle(name, &entry.line1, &entry.line2, offset)?;
        log::info!("{}", record);
        records.push(record);
    }
    Ok(records)
}

/// Read and validate configuration, AOIs and element sets.
///
/// Any invalid entry fails the whole batch before a search starts.
pub fn load_inputs(paths: &InputPaths) -> Result<Inputs, RunError> {
    let config = SatelliteConfig::from_file(&paths.satellite_config)?;
    let aois = load_aois(&paths.aoi_file)?;

    let mut loader = TleLoader::new(paths.tle_file.clone());
    loader.load()?;
    let satellites = load_satellites(&loader, &config)?
        .into_iter()
        .map(Arc::new)
        .collect();

    Ok(Inputs { satellites, aois })
}

/// Search every (satellite, AOI) pair on blocking workers.
///
/// Results are gathered in enumeration order, satellites outermost, so the
/// output matches a sequential run.
pub async fn search_all<C>(
    inputs: &Inputs,
    window: SearchWindow,
    options: SearchOptions,
    collaborators: Arc<C>,
) -> Result<Vec<Pass>, RunError>
where
    C: OrbitalStateProvider + PassEventFinder + OrbitNumbering + Send + Sync + 'static,
{
    let mut handles = Vec::with_capacity(inputs.satellites.len() * inputs.aois.len());
    for satellite in &inputs.satellites {
        for aoi in &inputs.aois {
            let satellite = Arc::clone(satellite);
            let aoi = aoi.clone();
            let collaborators = Arc::clone(&collaborators);
            handles.push(tokio::task::spawn_blocking(move || {
                let passes =
                    search_passes(&aoi, &satellite, &window, &options, collaborators.as_ref())?;
                log::info!(
                    "{} over {}: {} passes",
                    satellite.name,
                    aoi.name,
                    passes.len()
                );
                Ok::<_, SearchError>(passes)
            }));
        }
    }

    let mut all = Vec::new();
    for handle in handles {
        all.extend(handle.await??);
    }
    Ok(all)
}

/// Refresh element sets, search, and write the reports.
pub async fn run_search(settings: &RunSettings) -> Result<usize, RunError> {
    refresh_tle_cache(
        &settings.tle_url,
        &settings.inputs.tle_file,
        settings.tle_max_age,
    )
    .await?;

    let inputs = load_inputs(&settings.inputs)?;
    log::info!(
        "Searching {} satellites over {} AOIs from {} to {}",
        inputs.satellites.len(),
        inputs.aois.len(),
        settings.window.start,
        settings.window.end
    );

    let passes = search_all(
        &inputs,
        settings.window,
        settings.options,
        Arc::new(Sgp4Predictor::default()),
    )
    .await?;
    let passes = report::assemble(passes);

    let context = ReportContext {
        window: settings.window,
        max_off_nadir_deg: settings.options.max_off_nadir_deg,
    };
    report::write_html_report(
        &settings.template_html,
        &settings.placeholder,
        &settings.output_html,
        &passes,
        &context,
    )?;
    if let Some(json) = &settings.output_json {
        report::write_json_report(json, &passes)?;
    }

    Ok(passes.len())
}
