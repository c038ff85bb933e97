//! Gizmo flattening: replace gizmo instances with equivalent groups.
//!
//! A one-to-one structural substitution: the group carries the gizmo's
//! interior network, knob values, and connections verbatim; only the node
//! kind changes. Instances whose definition cannot be loaded are skipped
//! and reported, processing continues.

use std::collections::HashMap;

use log::info;
use uuid::Uuid;

use crate::report::{CollectError, RunReport};
use crate::scene::keys::K_GIZMO_FILE;
use crate::scene::{GizmoLibrary, Node, NodeKind, Scene, SceneGraph};

/// Flatten every gizmo instance in the scene's top-level graph.
///
/// Each instance either flattens or is skipped with a recorded error;
/// a skipped gizmo is left in the graph untouched.
pub fn flatten_gizmos(scene: &mut Scene, library: &mut GizmoLibrary, report: &mut RunReport) {
    let gizmos: Vec<Uuid> = scene
        .graph
        .nodes()
        .filter(|n| n.is_gizmo())
        .map(|n| n.uuid)
        .collect();

    for uuid in gizmos {
        match flatten_one(&mut scene.graph, uuid, library) {
            Ok(name) => {
                report.gizmos_flattened += 1;
                info!("Flattened gizmo '{}' into a group", name);
            }
            Err(error) => {
                report.gizmos_skipped += 1;
                report.record(error);
            }
        }
    }
}

fn flatten_one(
    graph: &mut SceneGraph,
    uuid: Uuid,
    library: &mut GizmoLibrary,
) -> Result<String, CollectError> {
    let (class, file_hint, name, knobs, inputs, index) = {
        let node = graph
            .get(uuid)
            .ok_or_else(|| CollectError::Scene(format!("gizmo node {} vanished", uuid)))?;
        let NodeKind::Gizmo(class) = &node.kind else {
            return Err(CollectError::Scene(format!(
                "node '{}' is not a gizmo",
                node.name
            )));
        };
        (
            class.clone(),
            node.knobs.get_str(K_GIZMO_FILE).map(str::to_owned),
            node.name.clone(),
            node.knobs.clone(),
            node.inputs.clone(),
            graph.index_of(uuid).unwrap_or(graph.len()),
        )
    };

    let def = library.load(&class, file_hint.as_deref())?;

    let mut group = Node::new(&name, NodeKind::Group);
    group.knobs = def.knobs.clone();
    group.knobs.overlay(&knobs);
    // The delivered group has no definition file to point at
    group.knobs.remove(K_GIZMO_FILE);
    group.inputs = inputs;
    // Keep the arity the definition declares even when trailing arrows
    // were left unconnected on the instance
    if group.inputs.len() < def.max_inputs {
        group.inputs.resize(def.max_inputs, None);
    }
    group.interior = Some(remap_uuids(&def.interior));

    let group_uuid = group.uuid;
    graph.rewire(uuid, group_uuid);
    graph.remove(uuid);
    graph.insert_at(index, group);

    Ok(name)
}

/// Clone a definition interior with fresh UUIDs.
///
/// Two instances of the same gizmo must not share interior node identities;
/// internal connections are remapped to the new UUIDs.
fn remap_uuids(src: &SceneGraph) -> SceneGraph {
    let map: HashMap<Uuid, Uuid> = src.nodes().map(|n| (n.uuid, Uuid::new_v4())).collect();

    let mut out = SceneGraph::new();
    for node in src.nodes() {
        let mut copy = node.clone();
        copy.uuid = map[&node.uuid];
        copy.inputs = node
            .inputs
            .iter()
            .map(|input| input.and_then(|u| map.get(&u).copied()))
            .collect();
        if let Some(inner) = &node.interior {
            copy.interior = Some(remap_uuids(inner));
        }
        out.add(copy);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::scene::gizmo::{GIZMO_EXT, GizmoDef};
    use crate::scene::keys::{K_TILE_COLOR, K_XPOS};
    use crate::scene::knobs::KnobValue;

    /// Definition with a two-node interior (Blur -> Grade) and one default knob.
    fn test_def(class: &str) -> GizmoDef {
        let mut def = GizmoDef {
            class: class.to_string(),
            max_inputs: 1,
            ..Default::default()
        };
        def.knobs.set("size", KnobValue::Float(10.0));

        let blur = def.interior.add(Node::new("Blur1", NodeKind::Native("Blur".into())));
        let mut grade = Node::new("Grade1", NodeKind::Native("Grade".into()));
        grade.set_input(0, Some(blur));
        def.interior.add(grade);
        def
    }

    fn library_with(class: &str) -> (tempfile::TempDir, GizmoLibrary) {
        let dir = tempfile::tempdir().unwrap();
        let json = serde_json::to_string_pretty(&test_def(class)).unwrap();
        fs::write(dir.path().join(format!("{}.{}", class, GIZMO_EXT)), json).unwrap();
        let library = GizmoLibrary::new(vec![dir.path().to_path_buf()]);
        (dir, library)
    }

    /// Read -> gizmo -> Write chain around one gizmo instance.
    fn scene_with_gizmo(class: &str) -> (Scene, Uuid) {
        let mut scene = Scene::new("shot.json");
        let read = scene
            .graph
            .add(Node::new("Read1", NodeKind::Native("Read".into())));

        let mut gizmo = Node::new("Sharpen1", NodeKind::Gizmo(class.into()));
        gizmo.set_input(0, Some(read));
        gizmo.knobs.set("size", KnobValue::Float(42.0));
        gizmo.knobs.set(K_XPOS, KnobValue::Int(120));
        gizmo.knobs.set(K_TILE_COLOR, KnobValue::Int(0x00ff00));
        let gizmo_uuid = scene.graph.add(gizmo);

        let mut write = Node::new("Write1", NodeKind::Native("Write".into()));
        write.set_input(0, Some(gizmo_uuid));
        scene.graph.add(write);

        (scene, gizmo_uuid)
    }

    #[test]
    fn gizmo_becomes_group_with_same_connections() {
        let (_dir, mut library) = library_with("SharpKit");
        let (mut scene, gizmo_uuid) = scene_with_gizmo("SharpKit");
        let mut report = RunReport::new();

        flatten_gizmos(&mut scene, &mut library, &mut report);

        assert_eq!(report.gizmos_flattened, 1);
        assert_eq!(report.gizmos_skipped, 0);
        assert!(scene.graph.get(gizmo_uuid).is_none());

        let group = scene.graph.by_name("Sharpen1").expect("group exists");
        assert_eq!(group.kind, NodeKind::Group);

        // Upstream edge preserved
        let read = scene.graph.by_name("Read1").unwrap();
        assert_eq!(group.inputs, vec![Some(read.uuid)]);

        // Downstream edge rewired to the group
        let write = scene.graph.by_name("Write1").unwrap();
        assert_eq!(write.inputs, vec![Some(group.uuid)]);
        assert_eq!(scene.graph.downstream_of(group.uuid).len(), 1);
    }

    #[test]
    fn interior_is_isomorphic_to_definition() {
        let (_dir, mut library) = library_with("SharpKit");
        let (mut scene, _) = scene_with_gizmo("SharpKit");
        let mut report = RunReport::new();

        flatten_gizmos(&mut scene, &mut library, &mut report);

        let group = scene.graph.by_name("Sharpen1").unwrap();
        let interior = group.interior.as_ref().expect("group has interior");
        let def = test_def("SharpKit");

        assert_eq!(interior.len(), def.interior.len());
        for (mine, theirs) in interior.nodes().zip(def.interior.nodes()) {
            assert_eq!(mine.name, theirs.name);
            assert_eq!(mine.kind, theirs.kind);
            assert_eq!(mine.connected_inputs(), theirs.connected_inputs());
        }
        // Internal edge Blur1 -> Grade1 survives the uuid remap
        let blur = interior.by_name("Blur1").unwrap();
        let grade = interior.by_name("Grade1").unwrap();
        assert_eq!(grade.inputs, vec![Some(blur.uuid)]);
    }

    #[test]
    fn instance_knobs_overlay_defaults() {
        let (_dir, mut library) = library_with("SharpKit");
        let (mut scene, _) = scene_with_gizmo("SharpKit");
        let mut report = RunReport::new();

        flatten_gizmos(&mut scene, &mut library, &mut report);

        let group = scene.graph.by_name("Sharpen1").unwrap();
        assert_eq!(group.knobs.get_float("size"), Some(42.0));
        assert_eq!(group.knobs.get_i32(K_XPOS), Some(120));
        assert_eq!(group.knobs.get_i32(K_TILE_COLOR), Some(0x00ff00));
        assert!(!group.knobs.contains(K_GIZMO_FILE));
    }

    #[test]
    fn two_instances_get_distinct_interior_uuids() {
        let (_dir, mut library) = library_with("SharpKit");
        let mut scene = Scene::new("shot.json");
        scene
            .graph
            .add(Node::new("A", NodeKind::Gizmo("SharpKit".into())));
        scene
            .graph
            .add(Node::new("B", NodeKind::Gizmo("SharpKit".into())));
        let mut report = RunReport::new();

        flatten_gizmos(&mut scene, &mut library, &mut report);
        assert_eq!(report.gizmos_flattened, 2);

        let a = scene.graph.by_name("A").unwrap();
        let b = scene.graph.by_name("B").unwrap();
        let a_uuids: Vec<Uuid> = a.interior.as_ref().unwrap().uuids();
        let b_uuids: Vec<Uuid> = b.interior.as_ref().unwrap().uuids();
        assert!(a_uuids.iter().all(|u| !b_uuids.contains(u)));
    }

    #[test]
    fn missing_definition_skips_and_keeps_node() {
        let dir = tempfile::tempdir().unwrap();
        let mut library = GizmoLibrary::new(vec![dir.path().to_path_buf()]);
        let (mut scene, gizmo_uuid) = scene_with_gizmo("NotInstalled");
        let mut report = RunReport::new();

        flatten_gizmos(&mut scene, &mut library, &mut report);

        assert_eq!(report.gizmos_flattened, 0);
        assert_eq!(report.gizmos_skipped, 1);
        assert_eq!(report.errors.len(), 1);
        // Instance untouched, connections intact
        let node = scene.graph.get(gizmo_uuid).expect("gizmo still present");
        assert!(node.is_gizmo());
        assert_eq!(scene.graph.downstream_of(gizmo_uuid).len(), 1);
    }
}
