use serde::{Deserialize, Serialize};
use sv_core::{DatasetInfo, Extent, Point3, Volume};
use sv_mask::{InMemoryBlocks, InMemoryCombined, SurfaceSource};
use sv_tree::SkeletonGraph;

use crate::{HostGateway, RunError, SceneError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDto {
    pub min: [f64; 3],
    pub max: [f64; 3],
    pub size: [usize; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonDto {
    pub positions: Vec<[f64; 3]>,
    pub edges: Vec<[usize; 2]>,
    pub radii: Vec<f64>,
    pub types: Vec<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beginning: Option<usize>,
}

/// One surface id: physical bounding box plus its sub-mask, x fastest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDto {
    pub min: [f64; 3],
    pub max: [f64; 3],
    pub dims: [usize; 3],
    /// Non-zero entries are set.
    pub mask: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SurfaceDto {
    Combined {
        name: String,
        ids: usize,
        dims: [usize; 3],
        mask: Vec<i16>,
    },
    Blocks {
        name: String,
        blocks: Vec<BlockDto>,
    },
}

impl SurfaceDto {
    pub fn name(&self) -> &str {
        match self {
            SurfaceDto::Combined { name, .. } | SurfaceDto::Blocks { name, .. } => name,
        }
    }
}

/// Scene file layout. Every part is optional so that a missing dataset or
/// skeleton surfaces as a run error rather than a parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDto {
    #[serde(default)]
    pub dataset: Option<DatasetDto>,
    #[serde(default)]
    pub skeleton: Option<SkeletonDto>,
    #[serde(default)]
    pub surfaces: Vec<SurfaceDto>,
}

#[derive(Debug, Clone)]
enum SceneSurface {
    Combined(InMemoryCombined),
    Blocks(InMemoryBlocks),
}

/// In-memory host backed by a JSON scene description.
#[derive(Debug, Clone, Default)]
pub struct JsonScene {
    dataset: Option<DatasetInfo>,
    skeleton: Option<SkeletonDto>,
    surfaces: Vec<(String, SceneSurface)>,
}

impl JsonScene {
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        let dto: SceneDto = serde_json::from_str(text)?;
        Self::from_dto(dto)
    }

    pub fn from_dto(dto: SceneDto) -> Result<Self, SceneError> {
        let dataset = dto.dataset.map(|d| DatasetInfo {
            extent: Extent::new(Point3::from_array(d.min), Point3::from_array(d.max)),
            size: d.size,
        });

        let mut surfaces = Vec::with_capacity(dto.surfaces.len());
        for s in dto.surfaces {
            let surface = match s {
                SurfaceDto::Combined {
                    name,
                    ids,
                    dims,
                    mask,
                } => {
                    let mask = Volume::from_vec(dims, mask).map_err(|source| SceneError::Mask {
                        name: name.clone(),
                        source,
                    })?;
                    (name, SceneSurface::Combined(InMemoryCombined { ids, mask }))
                }
                SurfaceDto::Blocks { name, blocks } => {
                    let mut mem = InMemoryBlocks::default();
                    for b in blocks {
                        let mask: Vec<bool> = b.mask.iter().map(|&v| v != 0).collect();
                        let mask =
                            Volume::from_vec(b.dims, mask).map_err(|source| SceneError::Mask {
                                name: name.clone(),
                                source,
                            })?;
                        let extent =
                            Extent::new(Point3::from_array(b.min), Point3::from_array(b.max));
                        mem.blocks.push((extent, mask));
                    }
                    (name, SceneSurface::Blocks(mem))
                }
            };
            surfaces.push(surface);
        }

        Ok(Self {
            dataset,
            skeleton: dto.skeleton,
            surfaces,
        })
    }

    pub fn to_dto(&self) -> SceneDto {
        SceneDto {
            dataset: self.dataset.map(|d| DatasetDto {
                min: d.extent.min.to_array(),
                max: d.extent.max.to_array(),
                size: d.size,
            }),
            skeleton: self.skeleton.clone(),
            surfaces: self
                .surfaces
                .iter()
                .map(|(name, s)| match s {
                    SceneSurface::Combined(c) => SurfaceDto::Combined {
                        name: name.clone(),
                        ids: c.ids,
                        dims: c.mask.dims(),
                        mask: c.mask.data().to_vec(),
                    },
                    SceneSurface::Blocks(b) => SurfaceDto::Blocks {
                        name: name.clone(),
                        blocks: b
                            .blocks
                            .iter()
                            .map(|(extent, mask)| BlockDto {
                                min: extent.min.to_array(),
                                max: extent.max.to_array(),
                                dims: mask.dims(),
                                mask: mask.data().iter().map(|&v| u8::from(v)).collect(),
                            })
                            .collect(),
                    },
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_dto())
    }

    /// Replaces the scene skeleton, as the host does when importing SWC.
    pub fn set_skeleton(&mut self, graph: &SkeletonGraph) {
        self.skeleton = Some(SkeletonDto {
            positions: graph.positions().iter().map(|p| p.to_array()).collect(),
            edges: graph.edges().iter().map(|&(a, b)| [a, b]).collect(),
            radii: graph.radii().to_vec(),
            types: graph.types().to_vec(),
            beginning: graph.beginning(),
        });
    }
}

impl HostGateway for JsonScene {
    fn dataset(&self) -> Result<DatasetInfo, RunError> {
        self.dataset.ok_or(RunError::NoDataset)
    }

    fn skeleton(&self) -> Result<SkeletonGraph, RunError> {
        let dto = self.skeleton.as_ref().ok_or(RunError::NoSkeleton)?;
        let graph = SkeletonGraph::new(
            dto.positions.iter().map(|&p| Point3::from_array(p)).collect(),
            dto.edges.iter().map(|&[a, b]| (a, b)).collect(),
            dto.radii.clone(),
            dto.types.clone(),
        )?;
        match dto.beginning {
            Some(b) => Ok(graph.with_beginning(b)?),
            None => Ok(graph),
        }
    }

    fn surface_names(&self) -> Vec<String> {
        self.surfaces.iter().map(|(name, _)| name.clone()).collect()
    }

    fn surface(&self, name: &str) -> Option<SurfaceSource<'_>> {
        self.surfaces
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| match s {
                SceneSurface::Combined(c) => SurfaceSource::Combined(c),
                SceneSurface::Blocks(b) => SurfaceSource::Blocks(b),
            })
    }
}

#[cfg(test)]
mod tests {
    use sv_core::Point3;
    use sv_mask::SurfaceSource;
    use sv_tree::TreeError;

    use super::JsonScene;
    use crate::{HostGateway, RunError, SceneError};

    const SCENE: &str = r#"{
        "dataset": { "min": [0, 0, 0], "max": [4, 4, 2], "size": [4, 4, 2] },
        "skeleton": {
            "positions": [[0.5, 0.5, 0.5], [3.5, 0.5, 0.5]],
            "edges": [[0, 1]],
            "radii": [1.0, 0.5],
            "types": [0, 0],
            "beginning": 1
        },
        "surfaces": [
            { "kind": "combined", "name": "soma", "ids": 1, "dims": [2, 1, 1], "mask": [0, 3] },
            {
                "kind": "blocks",
                "name": "spines",
                "blocks": [{ "min": [1, 0, 0], "max": [2, 1, 1], "dims": [1, 1, 1], "mask": [1] }]
            }
        ]
    }"#;

    #[test]
    fn parses_scene_into_gateway_queries() {
        let scene = JsonScene::from_json(SCENE).expect("valid scene");

        let info = scene.dataset().expect("dataset present");
        assert_eq!(info.size, [4, 4, 2]);
        assert_eq!(info.extent.max, Point3::new(4.0, 4.0, 2.0));

        let g = scene.skeleton().expect("skeleton present");
        assert_eq!(g.len(), 2);
        assert_eq!(g.root(), 1);

        assert_eq!(scene.surface_names(), vec!["soma", "spines"]);
        assert!(matches!(scene.surface("soma"), Some(SurfaceSource::Combined(_))));
        assert!(matches!(scene.surface("spines"), Some(SurfaceSource::Blocks(_))));
        assert!(scene.surface("axon").is_none());
    }

    #[test]
    fn missing_parts_map_to_run_errors() {
        let scene = JsonScene::from_json("{}").expect("valid scene");
        assert_eq!(scene.dataset(), Err(RunError::NoDataset));
        assert_eq!(scene.skeleton().map(|g| g.len()), Err(RunError::NoSkeleton));
        assert!(scene.surface_names().is_empty());
    }

    #[test]
    fn invalid_skeleton_is_reported_by_gateway() {
        let scene = JsonScene::from_json(
            r#"{ "skeleton": { "positions": [[0, 0, 0]], "edges": [[0, 3]],
                 "radii": [1], "types": [0] } }"#,
        )
        .expect("valid scene");
        assert_eq!(
            scene.skeleton().map(|g| g.len()),
            Err(RunError::Skeleton(TreeError::EdgeOutOfRange { a: 0, b: 3, len: 1 }))
        );
    }

    #[test]
    fn mask_length_mismatch_fails_load() {
        let err = JsonScene::from_json(
            r#"{ "surfaces": [{ "kind": "combined", "name": "x", "ids": 1,
                 "dims": [2, 2, 2], "mask": [1, 2, 3] }] }"#,
        )
        .expect_err("bad mask");
        assert!(matches!(err, SceneError::Mask { ref name, .. } if name == "x"), "{err:?}");
    }

    #[test]
    fn scene_survives_json_round_trip() {
        let scene = JsonScene::from_json(SCENE).expect("valid scene");
        let text = scene.to_json().expect("serializable");
        let again = JsonScene::from_json(&text).expect("valid scene");
        assert_eq!(again.to_dto(), scene.to_dto());
    }
}
