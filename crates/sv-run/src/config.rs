use serde::{Deserialize, Serialize};
use sv_core::FlipPolicy;
use sv_mask::Connectivity;
use sv_swc::SwcUnits;
use sv_tree::Traversal;

/// Options of one export run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    pub units: SwcUnits,
    pub flip: FlipPolicy,
    pub connectivity: Connectivity,
    pub traversal: Traversal,
    /// Surfaces to process by name; `None` selects every host surface.
    pub surfaces: Option<Vec<String>>,
    pub debug_overlay: bool,
    /// Extended SWC with label columns, or plain 7-column SWC.
    pub extended: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            units: SwcUnits::default(),
            flip: FlipPolicy::default(),
            connectivity: Connectivity::default(),
            traversal: Traversal::default(),
            surfaces: None,
            debug_overlay: false,
            extended: true,
        }
    }
}

impl ExportConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<ExportConfigDto>(text).map(Self::from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(
    feature = "clap",
    derive(clap::ValueEnum),
    value(rename_all = "snake_case")
)]
pub enum UnitsDto {
    #[default]
    Micron,
    Pixel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(
    feature = "clap",
    derive(clap::ValueEnum),
    value(rename_all = "snake_case")
)]
pub enum FlipDto {
    #[default]
    DepthOnly,
    AllAxes,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(
    feature = "clap",
    derive(clap::ValueEnum),
    value(rename_all = "snake_case")
)]
pub enum ConnectivityDto {
    C6,
    C18,
    #[default]
    C26,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(
    feature = "clap",
    derive(clap::ValueEnum),
    value(rename_all = "snake_case")
)]
pub enum TraversalDto {
    #[default]
    DepthFirst,
    BreadthFirst,
}

/// Serialized form of [`ExportConfig`]; missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfigDto {
    pub units: UnitsDto,
    pub flip: FlipDto,
    pub connectivity: ConnectivityDto,
    pub traversal: TraversalDto,
    pub surfaces: Option<Vec<String>>,
    pub debug_overlay: bool,
    pub extended: bool,
}

impl Default for ExportConfigDto {
    fn default() -> Self {
        Self::from(&ExportConfig::default())
    }
}

impl From<ExportConfigDto> for ExportConfig {
    fn from(dto: ExportConfigDto) -> Self {
        Self {
            units: match dto.units {
                UnitsDto::Micron => SwcUnits::Micron,
                UnitsDto::Pixel => SwcUnits::Pixel,
            },
            flip: match dto.flip {
                FlipDto::DepthOnly => FlipPolicy::DepthOnly,
                FlipDto::AllAxes => FlipPolicy::AllAxes,
                FlipDto::Disabled => FlipPolicy::Disabled,
            },
            connectivity: match dto.connectivity {
                ConnectivityDto::C6 => Connectivity::C6,
                ConnectivityDto::C18 => Connectivity::C18,
                ConnectivityDto::C26 => Connectivity::C26,
            },
            traversal: match dto.traversal {
                TraversalDto::DepthFirst => Traversal::DepthFirst,
                TraversalDto::BreadthFirst => Traversal::BreadthFirst,
            },
            surfaces: dto.surfaces,
            debug_overlay: dto.debug_overlay,
            extended: dto.extended,
        }
    }
}

impl From<&ExportConfig> for ExportConfigDto {
    fn from(cfg: &ExportConfig) -> Self {
        Self {
            units: match cfg.units {
                SwcUnits::Micron => UnitsDto::Micron,
                SwcUnits::Pixel => UnitsDto::Pixel,
            },
            flip: match cfg.flip {
                FlipPolicy::DepthOnly => FlipDto::DepthOnly,
                FlipPolicy::AllAxes => FlipDto::AllAxes,
                FlipPolicy::Disabled => FlipDto::Disabled,
            },
            connectivity: match cfg.connectivity {
                Connectivity::C6 => ConnectivityDto::C6,
                Connectivity::C18 => ConnectivityDto::C18,
                Connectivity::C26 => ConnectivityDto::C26,
            },
            traversal: match cfg.traversal {
                Traversal::DepthFirst => TraversalDto::DepthFirst,
                Traversal::BreadthFirst => TraversalDto::BreadthFirst,
            },
            surfaces: cfg.surfaces.clone(),
            debug_overlay: cfg.debug_overlay,
            extended: cfg.extended,
        }
    }
}
