use crate::config::{CompanyConfig, Config};
use crate::constants::{DATA_DIR, UNIFIED_SCHEDULE_FILE};
use crate::error::Result;
use crate::normalize::{backfill_vessel_names, merge_departures, normalize_week};
use crate::sources::create_source;
use crate::types::{Departure, RawWeekData, ScheduleSource};
use chrono::{Local, NaiveDate};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// One successfully fetched (company, week) pair of raw data.
struct FetchedWeek {
    company: CompanyConfig,
    week: u32,
    year: i32,
    data: RawWeekData,
}

/// Result of a complete fetch run.
#[derive(Debug)]
pub struct RunSummary {
    pub total_companies: usize,
    pub configured_companies: usize,
    pub fetched_weeks: usize,
    pub departures: usize,
    pub errors: Vec<String>,
    pub output_file: PathBuf,
}

pub struct Pipeline;

impl Pipeline {
    /// Fetch both weeks for every configured company, normalize and merge the
    /// results and write the unified schedule document.
    ///
    /// A failing company is logged and skipped; only I/O failures on our own
    /// outputs abort the run.
    pub async fn fetch_all(
        config: &Config,
        output_dir: &Path,
        today: NaiveDate,
    ) -> Result<RunSummary> {
        let companies = config.configured_companies();
        info!(
            "{} of {} companies configured",
            companies.len(),
            config.companies.len()
        );
        println!(
            "✅ {} compagnie(s) configurée(s) sur {} au total",
            companies.len(),
            config.companies.len()
        );

        let mut build_errors = Vec::new();
        let mut sources: Vec<Box<dyn ScheduleSource>> = Vec::new();
        for company in &companies {
            match create_source(company) {
                Ok(source) => sources.push(source),
                Err(e) => {
                    warn!("Cannot build source for {}: {}", company.name, e);
                    build_errors.push(format!("{}: {}", company.name, e));
                }
            }
        }

        let mut summary = Self::fetch_with_sources(&sources, output_dir, today).await?;
        summary.total_companies = config.companies.len();
        summary.configured_companies = companies.len();
        summary.errors.extend(build_errors);
        Ok(summary)
    }

    /// Run the fetch loop over pre-built sources. Split out from
    /// [`Pipeline::fetch_all`] so alternate sources can be driven through the
    /// same loop.
    #[instrument(skip(sources, output_dir))]
    pub async fn fetch_with_sources(
        sources: &[Box<dyn ScheduleSource>],
        output_dir: &Path,
        today: NaiveDate,
    ) -> Result<RunSummary> {
        let weeks = crate::week::fetch_weeks(today);
        println!(
            "📅 Récupération des semaines {} et {} de {}",
            weeks[0].0, weeks[1].0, weeks[0].1
        );

        let mut fetched = Vec::new();
        let mut errors = Vec::new();

        for source in sources {
            let company = source.company();
            for (week, year) in weeks {
                println!("\n🚢 Traitement de {} - Semaine {}...", company.name, week);
                match source.fetch_week(week, year).await {
                    Ok(Some(mut data)) => {
                        backfill_vessel_names(company, &mut data);
                        if let Err(e) = Self::write_week_snapshot(
                            output_dir, company, week, year, &data,
                        ) {
                            warn!("Failed to save snapshot for {}: {}", company.name, e);
                        }
                        println!("✅ Données récupérées pour {}", company.name);
                        fetched.push(FetchedWeek {
                            company: company.clone(),
                            week,
                            year,
                            data,
                        });
                    }
                    Ok(None) => {
                        println!(
                            "❌ Aucune donnée trouvée pour {} (semaine {})",
                            company.name, week
                        );
                    }
                    Err(e) => {
                        warn!(
                            "Fetch failed for {} week {}: {}",
                            company.name, week, e
                        );
                        println!("❌ Erreur pour {}: {}", company.name, e);
                        errors.push(format!("{} (semaine {}): {}", company.name, week, e));
                    }
                }
            }
        }

        let mut all_departures = Vec::new();
        for fetched_week in &fetched {
            all_departures.extend(normalize_week(
                &fetched_week.company,
                &fetched_week.data,
                fetched_week.week,
                fetched_week.year,
            ));
        }
        let departures = merge_departures(all_departures);

        let output_file = Self::write_unified(&departures, output_dir)?;
        info!(
            "Wrote {} departures to {}",
            departures.len(),
            output_file.display()
        );
        println!(
            "\n✅ Fichier {} créé avec {} horaires",
            UNIFIED_SCHEDULE_FILE,
            departures.len()
        );

        Ok(RunSummary {
            total_companies: sources.len(),
            configured_companies: sources.len(),
            fetched_weeks: fetched.len(),
            departures: departures.len(),
            errors,
            output_file,
        })
    }

    /// Persist one company's raw week under `data/{id}_week{week}.json`.
    fn write_week_snapshot(
        output_dir: &Path,
        company: &CompanyConfig,
        week: u32,
        year: i32,
        data: &RawWeekData,
    ) -> Result<PathBuf> {
        let data_dir = output_dir.join(DATA_DIR);
        fs::create_dir_all(&data_dir)?;

        let mut snapshot = json!({
            "company": company.name,
            "companyId": company.id,
            "week": week,
            "year": year,
            "data": data,
            "lastUpdate": Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S").to_string(),
        });
        if company.static_schedule {
            snapshot["source"] = json!("static");
        }

        let path = data_dir.join(format!("{}_week{}.json", company.id, week));
        fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;
        Ok(path)
    }

    /// Persist the merged, sorted departure list.
    fn write_unified(departures: &[Departure], output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(UNIFIED_SCHEDULE_FILE);
        fs::write(&path, serde_json::to_string_pretty(departures)?)?;
        Ok(path)
    }

    /// Read back a previously written unified schedule document.
    pub fn load_unified(output_dir: &Path) -> Result<Vec<Departure>> {
        let path = output_dir.join(UNIFIED_SCHEDULE_FILE);
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
