//! End-to-end tests for the Pipeline API.

use std::thread;

use float_cmp::assert_approx_eq;

use cadence::{
    Pipeline,
    config::{AppConfig, LayoutConfig, SyncConfig, TimelineConfig},
    identifier::Id,
    semantic::{ElementCategory, LayoutAlgorithm},
    structure::{Cluster, Diagram, Edge, Node},
    sync::{Continuous, FrameSequence, Grouping, Narration, SyncAdapter, SyncView},
};

fn services() -> Diagram {
    let mut diagram = Diagram::new().with_title("Services");
    for (id, label) in [
        ("api", "API Gateway"),
        ("auth", "Auth Service"),
        ("users", "User Service"),
        ("db", "Database"),
    ] {
        diagram.add_node(Node::new(id, label)).unwrap();
    }
    for (source, target) in [
        ("api", "auth"),
        ("api", "users"),
        ("auth", "db"),
        ("users", "db"),
    ] {
        diagram.add_edge(Edge::new(source, target)).unwrap();
    }
    diagram
}

fn chain(len: usize) -> Diagram {
    let mut diagram = Diagram::new();
    for i in 0..len {
        diagram
            .add_node(Node::new(format!("n{i}").as_str(), format!("Node {i}")))
            .unwrap();
    }
    for i in 1..len {
        diagram
            .add_edge(Edge::new(
                format!("n{}", i - 1).as_str(),
                format!("n{i}").as_str(),
            ))
            .unwrap();
    }
    diagram
}

#[test]
fn test_services_walkthrough() {
    let rendered = Pipeline::default().run(&services()).unwrap();
    let timeline = rendered.timeline();

    let ids: Vec<String> = timeline
        .entries()
        .iter()
        .map(|entry| entry.element_id().to_string())
        .collect();
    assert_eq!(
        ids,
        [
            "api",
            "auth",
            "users",
            "db",
            "api->auth",
            "api->users",
            "auth->db",
            "users->db",
        ]
    );
    for (i, entry) in timeline.entries().iter().enumerate() {
        assert_eq!(entry.index(), i);
    }

    assert_approx_eq!(f64, timeline.total_duration(), 2.6, epsilon = 1e-9);
    assert_eq!(rendered.frames().unwrap().total_frames(), 78);
}

#[test]
fn test_every_view_reports_timeline_duration() {
    let rendered = Pipeline::default().run(&services()).unwrap();
    let timeline = rendered.timeline();
    let total = timeline.total_duration();

    assert_eq!(Continuous.project(timeline).unwrap().total_duration(), total);
    for fps in [24.0, 30.0, 60.0] {
        let frames = FrameSequence::new(fps).project(timeline).unwrap();
        assert_eq!(frames.total_duration(), total);
    }
    for grouping in [Grouping::PerElement, Grouping::ByCategory] {
        let script = Narration::new(grouping).project(timeline).unwrap();
        assert_eq!(script.total_duration(), total);
    }
}

#[test]
fn test_every_algorithm_places_every_node() {
    let diagram = services();
    let pipeline = Pipeline::default();

    for algorithm in [
        LayoutAlgorithm::Grid,
        LayoutAlgorithm::Horizontal,
        LayoutAlgorithm::Vertical,
        LayoutAlgorithm::Radial,
    ] {
        let layout = pipeline.layout_with(&diagram, algorithm).unwrap();
        assert_eq!(layout.node_order().len(), 4, "{algorithm}");

        let centers: Vec<_> = layout.diagram().nodes().map(|n| n.position()).collect();
        for (i, a) in centers.iter().enumerate() {
            for b in &centers[i + 1..] {
                assert_ne!(a, b, "{algorithm} placed two nodes on one center");
            }
        }
        for edge in layout.diagram().edges() {
            assert_eq!(edge.waypoints().len(), 3);
        }
    }
}

#[test]
fn test_large_diagram_is_simplified() {
    let rendered = Pipeline::default().run(&chain(14)).unwrap();
    let diagram = rendered.layout().diagram();

    assert_eq!(diagram.node_count(), 10);
    assert!(rendered.warnings().is_empty());
    for edge in diagram.edges() {
        assert!(diagram.contains_node(edge.source()));
        assert!(diagram.contains_node(edge.target()));
    }
    assert_eq!(rendered.timeline().len(), diagram.element_count());
}

#[test]
fn test_clusters_are_revealed_first() {
    let mut diagram = services();
    diagram
        .add_cluster(Cluster::new("backend", "Backend", ["auth", "users", "db"]))
        .unwrap();

    let rendered = Pipeline::default().run(&diagram).unwrap();
    let first = &rendered.timeline().entries()[0];
    assert_eq!(first.element_id(), Id::new("backend"));
    assert_eq!(first.category(), ElementCategory::Cluster);
    assert_eq!(rendered.timeline().len(), 9);

    let cluster = rendered.layout().diagram().cluster(Id::new("backend")).unwrap();
    for member in cluster.members() {
        let node = rendered.layout().diagram().node(*member).unwrap();
        assert!(cluster.bounds().contains_bounds(&node.bounds()));
    }
}

#[test]
fn test_runs_are_deterministic() {
    let config = AppConfig::default()
        .with_layout(LayoutConfig::default().with_algorithm(LayoutAlgorithm::Radial));
    let pipeline = Pipeline::new(config).unwrap();

    let first = pipeline.run(&services()).unwrap();
    let second = pipeline.run(&services()).unwrap();

    assert_eq!(first.timeline(), second.timeline());
    assert_eq!(first.layout().node_order(), second.layout().node_order());
    for node in first.layout().diagram().nodes() {
        assert_eq!(
            Some(node.position()),
            second.layout().node_position(node.id())
        );
    }
}

#[test]
fn test_timeline_is_shared_across_threads() {
    let rendered = Pipeline::default().run(&services()).unwrap();
    let timeline = rendered.timeline();
    let expected = rendered.frames().unwrap();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let frames = FrameSequence::new(30.0).project(timeline).unwrap();
                    let css = Continuous.project(timeline).unwrap();
                    let script = Narration::default().project(timeline).unwrap();
                    (frames, css.total_duration(), script.total_duration())
                })
            })
            .collect();

        for handle in handles {
            let (frames, css_total, script_total) = handle.join().unwrap();
            assert_eq!(frames, expected);
            assert_eq!(css_total, timeline.total_duration());
            assert_eq!(script_total, timeline.total_duration());
        }
    });
}

#[test]
fn test_custom_timing_config() {
    let config = AppConfig::default()
        .with_timeline(
            TimelineConfig::default()
                .with_element_duration(1.0)
                .with_inter_element_delay(0.5)
                .with_initial_delay(1.0),
        )
        .with_sync(SyncConfig::default().with_fps(10.0));
    let rendered = Pipeline::new(config).unwrap().run(&services()).unwrap();

    // Eight elements: last starts at 1.0 + 7 * 0.5 and lasts 1.0.
    assert_eq!(rendered.timeline().total_duration(), 5.5);
    assert_eq!(rendered.frames().unwrap().total_frames(), 55);
    assert_eq!(rendered.timeline().entries()[0].start(), 1.0);
}

#[test]
fn test_empty_diagram_is_rejected() {
    assert!(Pipeline::default().run(&Diagram::new()).is_err());
}
