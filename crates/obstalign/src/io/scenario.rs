use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use obstalign_match::Obstacle;
use serde::Deserialize;

use super::{IoError, RawId};

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    scenario: Scenario,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    entities: Entities,
    storyboard: Storyboard,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entities {
    #[serde(default)]
    scenario_objects: Vec<ScenarioObject>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioObject {
    id: RawId,
    entity_object: EntityObject,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityObject {
    vehicle: Option<BoundedEntity>,
    unknown_unmovable_object: Option<BoundedEntity>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoundedEntity {
    bounding_box: BoundingBox,
}

#[derive(Debug, Deserialize)]
struct BoundingBox {
    dimensions: Dimensions,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Dimensions {
    length: f64,
    width: f64,
    height: f64,
}

#[derive(Debug, Deserialize)]
struct Storyboard {
    init: Init,
}

#[derive(Debug, Deserialize)]
struct Init {
    actions: InitActions,
}

#[derive(Debug, Deserialize)]
struct InitActions {
    #[serde(default)]
    privates: Vec<Private>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Private {
    entity_ref: EntityRef,
    #[serde(default)]
    private_actions: Vec<PrivateAction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityRef {
    entity_ref: RawId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrivateAction {
    teleport_action: Option<TeleportAction>,
}

#[derive(Debug, Deserialize)]
struct TeleportAction {
    position: Position,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Position {
    world_position: WorldPosition,
}

#[derive(Debug, Deserialize)]
struct WorldPosition {
    x: f64,
    y: f64,
    h: f64,
}

impl ScenarioFile {
    fn into_obstacles(self) -> Vec<Obstacle> {
        // vehicles and unmovable objects are the only boxed entities
        let dims = self
            .scenario
            .entities
            .scenario_objects
            .into_iter()
            .filter_map(|obj| {
                let entity = obj.entity_object;
                let bounded = entity.vehicle.or(entity.unknown_unmovable_object)?;
                Some((String::from(obj.id), bounded.bounding_box.dimensions))
            })
            .collect::<HashMap<_, _>>();

        let mut obstacles = Vec::new();
        for private in self.scenario.storyboard.init.actions.privates {
            let entity_ref = String::from(private.entity_ref.entity_ref);
            // only the first teleport of an entity defines its initial pose
            let Some(teleport) = private
                .private_actions
                .into_iter()
                .find_map(|action| action.teleport_action)
            else {
                continue;
            };
            let Some(d) = dims.get(&entity_ref) else {
                log::debug!("Skipping entity {entity_ref} without a bounding box");
                continue;
            };
            let pos = teleport.position.world_position;
            obstacles.push(Obstacle::new(
                entity_ref, pos.x, pos.y, pos.h, d.length, d.width, d.height,
            ));
        }
        obstacles
    }
}

/// Parse scenario obstacles from a reader.
///
/// Box dimensions come from `scenario.entities.scenarioObjects`, where only
/// `vehicle` and `unknownUnmovableObject` entities carry a bounding box.
/// Poses come from the first `teleportAction` world position of each entry
/// in `scenario.storyboard.init.actions.privates`. Entities without both
/// pieces are skipped. The output follows the order of the privates.
pub fn scenario_obstacles_from_reader(reader: impl Read) -> Result<Vec<Obstacle>, IoError> {
    let file: ScenarioFile = serde_json::from_reader(reader)?;
    Ok(file.into_obstacles())
}

/// Parse scenario obstacles from a JSON string.
pub fn scenario_obstacles_from_str(data: &str) -> Result<Vec<Obstacle>, IoError> {
    scenario_obstacles_from_reader(data.as_bytes())
}

/// Read the scenario obstacles from a file.
///
/// # Arguments
///
/// * `path` - The path to the scenario JSON file.
///
/// # Returns
///
/// The obstacles placed by the scenario's init actions.
pub fn read_scenario_obstacles(path: impl AsRef<Path>) -> Result<Vec<Obstacle>, IoError> {
    let file = File::open(path)?;
    let obstacles = scenario_obstacles_from_reader(BufReader::new(file))?;
    log::debug!("Read {} scenario obstacles", obstacles.len());
    Ok(obstacles)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
      "scenario": {
        "entities": {
          "scenarioObjects": [
            {"id": "1", "entityObject": {"vehicle": {"boundingBox": {"dimensions":
              {"length": 4.5, "width": 1.8, "height": 1.4}}}}},
            {"id": 2, "entityObject": {"unknownUnmovableObject": {"boundingBox": {"dimensions":
              {"length": 1.0, "width": 1.0, "height": 0.8}}}}},
            {"id": "3", "entityObject": {"pedestrian": {}}}
          ]
        },
        "storyboard": {
          "init": {
            "actions": {
              "privates": [
                {"entityRef": {"entityRef": "2"}, "privateActions": [
                  {"speedAction": {}},
                  {"teleportAction": {"position": {"worldPosition": {"x": 5.0, "y": 6.0, "h": 0.0}}}},
                  {"teleportAction": {"position": {"worldPosition": {"x": 99.0, "y": 99.0, "h": 0.0}}}}
                ]},
                {"entityRef": {"entityRef": "3"}, "privateActions": [
                  {"teleportAction": {"position": {"worldPosition": {"x": 0.0, "y": 0.0, "h": 0.0}}}}
                ]},
                {"entityRef": {"entityRef": "1"}, "privateActions": [
                  {"teleportAction": {"position": {"worldPosition": {"x": -1.0, "y": 2.5, "h": 1.57}}}}
                ]}
              ]
            }
          }
        }
      }
    }"#;

    #[test]
    fn test_parse_scenario() -> Result<(), IoError> {
        let obstacles = scenario_obstacles_from_str(SCENARIO)?;
        assert_eq!(obstacles.len(), 2);

        assert_eq!(obstacles[0].id, "2");
        assert_eq!((obstacles[0].x, obstacles[0].y), (5.0, 6.0));
        assert_eq!(obstacles[0].height, 0.8);

        assert_eq!(obstacles[1].id, "1");
        assert_eq!(obstacles[1].heading, 1.57);
        assert_eq!(obstacles[1].dimensions(), [4.5, 1.8, 1.4]);
        Ok(())
    }

    #[test]
    fn test_missing_world_position_is_error() {
        let data = r#"{"scenario": {"entities": {"scenarioObjects": []},
            "storyboard": {"init": {"actions": {"privates": [
              {"entityRef": {"entityRef": "1"}, "privateActions": [
                {"teleportAction": {"position": {"lanePosition": {}}}}]}
            ]}}}}}"#;
        assert!(matches!(
            scenario_obstacles_from_str(data),
            Err(IoError::JsonError(_))
        ));
    }
}
