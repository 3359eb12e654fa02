//! Entry point for callers rendering the incomes: reads raw snapshots, runs
//! the pipelines and caches their reports.

use crate::cache::{PipelineCache, SnapshotKey};
use crate::config::Config;
use crate::core::error::Result;
use crate::core::{EuropeIncomeReport, EuropePipeline, UkIncomeReport, UkPipeline};
use crate::input;
use std::sync::Arc;
use std::time::Duration;

/// Raw UK input snapshots, as read from disk.
#[derive(Debug, Clone)]
pub struct UkSnapshots {
    pub wages: Vec<u8>,
    pub graduate_salaries: Vec<u8>,
    pub price_index: Vec<u8>,
}

/// Raw European input snapshots.
#[derive(Debug, Clone)]
pub struct EuropeSnapshots {
    pub incomes: Vec<u8>,
    pub ppp: Vec<u8>,
    pub rates: Vec<u8>,
}

pub struct IncomeService {
    config: Config,
    config_snapshot: Vec<u8>,
    uk: UkPipeline,
    europe: EuropePipeline,
    uk_reports: PipelineCache<UkIncomeReport>,
    europe_reports: PipelineCache<EuropeIncomeReport>,
}

impl IncomeService {
    pub fn new(config: Config) -> Result<Self> {
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        Ok(IncomeService {
            config_snapshot: serde_json::to_vec(&config)?,
            uk: UkPipeline::new(&config.offsets, config.deductions.clone()),
            europe: EuropePipeline::new(&config.reference_country, &config.display_currency),
            uk_reports: PipelineCache::new(ttl),
            europe_reports: PipelineCache::new(ttl),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// UK real income report for `base_year` (the configured year if `None`).
    pub fn uk_report(
        &mut self,
        snapshots: &UkSnapshots,
        base_year: Option<i32>,
    ) -> Result<Arc<UkIncomeReport>> {
        let base_year = base_year.unwrap_or(self.config.base_year);
        let key = SnapshotKey::new(
            [
                self.config_snapshot.as_slice(),
                snapshots.wages.as_slice(),
                snapshots.graduate_salaries.as_slice(),
                snapshots.price_index.as_slice(),
            ],
            Some(base_year),
        );
        let pipeline = &self.uk;
        self.uk_reports.get_or_try_insert_with(key, || {
            let wages = input::read_wages(snapshots.wages.as_slice())?;
            let salaries = input::read_graduate_salaries(snapshots.graduate_salaries.as_slice())?;
            let index = input::read_price_index(snapshots.price_index.as_slice())?;
            pipeline.compute(&wages, &salaries, &index, base_year)
        })
    }

    pub fn europe_report(&mut self, snapshots: &EuropeSnapshots) -> Result<Arc<EuropeIncomeReport>> {
        let key = SnapshotKey::new(
            [
                self.config_snapshot.as_slice(),
                snapshots.incomes.as_slice(),
                snapshots.ppp.as_slice(),
                snapshots.rates.as_slice(),
            ],
            None,
        );
        let pipeline = &self.europe;
        self.europe_reports.get_or_try_insert_with(key, || {
            let incomes = input::read_europe_incomes(snapshots.incomes.as_slice())?;
            let ppp = input::read_ppp(snapshots.ppp.as_slice())?;
            let rates = input::read_rates(snapshots.rates.as_slice())?;
            pipeline.compute(&incomes, &ppp, &rates)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IncomeType;
    use rust_decimal_macros::dec;

    fn uk_snapshots() -> UkSnapshots {
        UkSnapshots {
            wages: b"Wages\nyear,nmw_rate,rlw_rate,stipend,allowance,counctax\n2023,10.42,10.90,18622,12570,1800\n"
                .to_vec(),
            graduate_salaries: b"time_period,gender,age_group,graduate_type,median\n\
2023,Total,21-30,Graduate,30000\n\
2023,Total,21-30,Non-Graduate,25000\n\
2023,Total,21-30,Postgraduate,34000\n"
                .to_vec(),
            price_index: b"CPIH\nyear,cpih\n2023,100\n2024,104\n".to_vec(),
        }
    }

    #[test]
    fn uk_report_cached_per_base_year() {
        let mut service = IncomeService::new(Config::default()).unwrap();
        let snapshots = uk_snapshots();

        let first = service.uk_report(&snapshots, Some(2023)).unwrap();
        let again = service.uk_report(&snapshots, Some(2023)).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        let rebased = service.uk_report(&snapshots, None).unwrap();
        assert_eq!(rebased.base_year, 2024);
        let nlw = rebased
            .series
            .get(2023, IncomeType::NationalLivingWage)
            .unwrap();
        assert_eq!(nlw.real_income, dec!(16369.2) * dec!(1.04));
    }

    #[test]
    fn europe_report_from_snapshots() {
        let mut service = IncomeService::new(Config::default()).unwrap();
        let snapshots = EuropeSnapshots {
            incomes: b"Incomes\ncountry,stip,tax,fee,curr\nUnited Kingdom,18622,0,0,GBP\nSwitzerland,12000,1000,500,CHF\n"
                .to_vec(),
            ppp: b"LOCATION,Country,Unit Code,Value\nGBR,United Kingdom,EUR,0.85\nCHE,Switzerland,EUR,1.2\n"
                .to_vec(),
            rates: br#"{"base": "EUR", "rates": {"GBP": 0.85, "CHF": 1.1}}"#.to_vec(),
        };
        let report = service.europe_report(&snapshots).unwrap();
        assert_eq!(report.absolute.len(), 2);
        assert_eq!(report.corrected.len(), 2);
        let uk = &report.corrected[0];
        assert_eq!(uk.country_code, "GBR");
        assert_eq!(uk.ppp_correction_factor, dec!(1));
    }
}
