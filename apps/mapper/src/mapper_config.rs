use std::env;
use std::path::PathBuf;

use liftmap_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT_DIR: &str = "./liftmap-out";
const DEFAULT_CHECKPOINT_FILE: &str = "plan.json";
const DECISION_REPORT_FILE: &str = "decisions.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperMode {
    Plan,
    Render,
    Run,
}

impl MapperMode {
    pub fn parse(value: Option<&str>) -> Result<Self, AppError> {
        match value.map(str::trim) {
            None | Some("") | Some("run") => Ok(Self::Run),
            Some("plan") => Ok(Self::Plan),
            Some("render") => Ok(Self::Render),
            Some(other) => Err(AppError::Validation(format!(
                "mode must be one of 'plan', 'render', or 'run', got '{other}'"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Render => "render",
            Self::Run => "run",
        }
    }

    fn plans(self) -> bool {
        matches!(self, Self::Plan | Self::Run)
    }
}

#[derive(Debug, Clone)]
pub struct PlanningInputs {
    pub access_map_csv: PathBuf,
    pub arc_map_json: PathBuf,
}

#[derive(Debug, Clone)]
pub struct MapperConfig {
    pub mode: MapperMode,
    pub planning: Option<PlanningInputs>,
    pub role_priority_json: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub checkpoint_path: PathBuf,
}

impl MapperConfig {
    pub fn load() -> Result<Self, AppError> {
        let mode_argument = env::args().nth(1);
        Self::from_lookup(mode_argument.as_deref(), |name| env::var(name).ok())
    }

    pub fn from_lookup(
        mode_argument: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let mode = MapperMode::parse(mode_argument)?;
        let optional_path = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .map(|value| PathBuf::from(value.trim()))
        };
        let required_path = |name: &str| {
            optional_path(name).ok_or_else(|| {
                AppError::Validation(format!("{name} is required in '{}' mode", mode.as_str()))
            })
        };

        let planning = if mode.plans() {
            Some(PlanningInputs {
                access_map_csv: required_path("LIFTMAP_ACCESS_MAP_CSV")?,
                arc_map_json: required_path("LIFTMAP_ARC_MAP_JSON")?,
            })
        } else {
            None
        };

        let output_dir = optional_path("LIFTMAP_OUTPUT_DIR")
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let checkpoint_path = optional_path("LIFTMAP_CHECKPOINT")
            .unwrap_or_else(|| output_dir.join(DEFAULT_CHECKPOINT_FILE));

        Ok(Self {
            mode,
            planning,
            role_priority_json: optional_path("LIFTMAP_ROLE_PRIORITY_JSON"),
            output_dir,
            checkpoint_path,
        })
    }

    pub fn decision_report_path(&self) -> PathBuf {
        self.output_dir.join(DECISION_REPORT_FILE)
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::{MapperConfig, MapperMode};

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        move |name| values.get(name).cloned()
    }

    #[test]
    fn run_is_the_default_mode() {
        assert_eq!(MapperMode::parse(None).ok(), Some(MapperMode::Run));
        assert_eq!(MapperMode::parse(Some("render")).ok(), Some(MapperMode::Render));
        assert!(MapperMode::parse(Some("deploy")).is_err());
    }

    #[test]
    fn planning_modes_require_inputs() {
        let result = MapperConfig::from_lookup(
            Some("plan"),
            lookup(&[("LIFTMAP_ACCESS_MAP_CSV", "access_map_input.csv")]),
        );
        assert!(result.is_err_and(|error| error.to_string().contains("LIFTMAP_ARC_MAP_JSON")));
    }

    #[test]
    fn outputs_default_under_output_dir() {
        let config = MapperConfig::from_lookup(
            None,
            lookup(&[
                ("LIFTMAP_ACCESS_MAP_CSV", "access_map_input.csv"),
                ("LIFTMAP_ARC_MAP_JSON", "predefined_arc_map.json"),
                ("LIFTMAP_OUTPUT_DIR", "out"),
                ("LIFTMAP_ROLE_PRIORITY_JSON", " "),
            ]),
        )
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.checkpoint_path, PathBuf::from("out/plan.json"));
        assert_eq!(config.decision_report_path(), PathBuf::from("out/decisions.csv"));
        assert!(config.role_priority_json.is_none());
        assert!(config.planning.is_some());
    }

    #[test]
    fn render_mode_needs_no_planning_inputs() {
        let config = MapperConfig::from_lookup(
            Some("render"),
            lookup(&[("LIFTMAP_CHECKPOINT", "/tmp/plan.json")]),
        )
        .unwrap_or_else(|_| unreachable!());

        assert!(config.planning.is_none());
        assert_eq!(config.checkpoint_path, PathBuf::from("/tmp/plan.json"));
        assert_eq!(config.output_dir, PathBuf::from("./liftmap-out"));
    }
}
