//! Presenter, resolver paths, and change notifications

mod common;

use common::{center_waypoint, config, folder, move_to, Fixture};
use ellipsekit_core::{
    EventBusConfig, EventCategory, EventFilter, ProgramEvent, ProgramEventBus, Waypoint,
};
use ellipsekit_program::sim::{MoveScreenResponse, SimulatedHost};
use ellipsekit_program::{
    AncestorResolver, EllipseCenterBehavior, EllipsePresenter, ProgramBehavior, ResolverChain,
    RingSynchronizer, SyncOutcome,
};
use ellipsekit_settings::Config;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn test_resolves_center_from_descendant() {
    let fx = Fixture::new().with_children(2);
    let leaf = fx.host.tree.children(&fx.center)[0].clone();
    let sync = RingSynchronizer::new(fx.host.api().with_selection(leaf), &config());

    assert_eq!(sync.resolve_center().await.unwrap(), fx.center);
}

#[tokio::test]
async fn test_nearest_ancestor_wins() {
    let fx = Fixture::new();
    let inner = fx
        .host
        .tree
        .insert_child(&fx.center, EllipseCenterBehavior.factory().unwrap())
        .unwrap();
    let leaf = fx.host.tree.insert_child(&inner, move_to()).unwrap();
    let sync = RingSynchronizer::new(fx.host.api().with_selection(leaf), &config());

    assert_eq!(sync.resolve_center().await.unwrap(), inner);
}

#[tokio::test]
async fn test_falls_back_to_contributed_instance() {
    let fx = Fixture::new();
    let elsewhere = fx.host.tree.add_root(folder());
    let sync = RingSynchronizer::new(fx.host.api().with_selection(elsewhere), &config());
    assert_eq!(sync.resolve_center().await.unwrap(), fx.center);

    let sync = RingSynchronizer::new(fx.host.api(), &config());
    assert_eq!(sync.resolve_center().await.unwrap(), fx.center);
}

#[tokio::test]
async fn test_custom_chain_without_fallback() {
    let fx = Fixture::new();
    let elsewhere = fx.host.tree.add_root(folder());
    let chain = ResolverChain::empty().with(AncestorResolver);
    let sync = RingSynchronizer::with_resolvers(
        fx.host.api().with_selection(elsewhere),
        &config(),
        chain,
    );

    let err = sync.resolve_center().await.unwrap_err();
    assert!(err.is_resolution_error());
    assert!(err.to_string().contains("strategies tried: 1"));
}

#[tokio::test]
async fn test_move_here_uses_stored_center() {
    let fx = Fixture::new();
    fx.capture(center_waypoint());
    let presenter =
        EllipsePresenter::new(fx.host.api().with_selection(fx.center.clone()), &config());

    let outcome = presenter.on_edit_center().await.unwrap();
    assert!(matches!(outcome, SyncOutcome::Regenerated(_)));

    let target = presenter.on_move_here().await.unwrap();
    assert_eq!(target, center_waypoint());
    assert_eq!(fx.host.moves.moves(), vec![center_waypoint()]);

    let (_, stored) = presenter.stored_center().await.unwrap();
    assert!(stored.is_defined);
}

#[tokio::test]
async fn test_move_here_before_definition() {
    let fx = Fixture::new();
    let presenter = EllipsePresenter::new(fx.host.api(), &config());

    let target = presenter.on_move_here().await.unwrap();
    assert_eq!(target, Waypoint::empty());
    assert!(fx.host.tree.mutations().is_empty());
}

#[tokio::test]
async fn test_move_screen_failure_is_reported() {
    let fx = Fixture::new();
    fx.host
        .moves
        .push(MoveScreenResponse::Fail("teach pendant busy".to_string()));
    let presenter =
        EllipsePresenter::new(fx.host.api().with_selection(fx.center.clone()), &config());

    let err = presenter.on_edit_center().await.unwrap_err();
    assert!(err.to_string().contains("teach pendant busy"));
    assert!(fx.host.tree.calls().is_empty());
}

#[tokio::test]
async fn test_events_published_in_order() {
    let fx = Fixture::new().with_children(1);
    let bus = Arc::new(ProgramEventBus::with_config(EventBusConfig {
        enable_history: true,
        ..Default::default()
    }));
    let refreshes = Arc::new(AtomicUsize::new(0));
    let counter = refreshes.clone();
    bus.subscribe(EventFilter::Categories(vec![EventCategory::Ui]), move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let host = fx
        .host
        .api()
        .with_selection(fx.center.clone())
        .with_notifier(bus.clone());
    let sync = RingSynchronizer::new(host, &config());
    sync.apply_center(center_waypoint()).await.unwrap();

    let history = bus.history();
    assert!(matches!(history[0], ProgramEvent::ChildRemoved { .. }));
    assert!(matches!(history[1], ProgramEvent::CenterSaved { .. }));
    let inserted = history
        .iter()
        .filter(|e| matches!(e, ProgramEvent::ChildInserted { .. }))
        .count();
    assert_eq!(inserted, 16);
    assert_eq!(
        history[history.len() - 2],
        ProgramEvent::RingRegenerated {
            node_id: fx.center.clone(),
            points: 16,
        }
    );
    assert_eq!(
        history[history.len() - 1],
        ProgramEvent::RefreshRequested {
            node_id: fx.center.clone(),
        }
    );
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_config_from_file_drives_ring() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ellipsekit.toml");
    std::fs::write(
        &path,
        r#"
        [ring]
        numberOfWaypoints = 6

        [sync]
        settleDelayMs = 1
        pointNamePrefix = "Ring"
        moveScreenLabel = "ellipse center"
        "#,
    )
    .unwrap();
    let cfg = Config::load_from_file(&path).unwrap();

    let host = SimulatedHost::new();
    let root = host.tree.add_root(folder());
    let center = host
        .tree
        .insert_child(&root, EllipseCenterBehavior.factory().unwrap())
        .unwrap();
    host.moves.push(MoveScreenResponse::Capture(center_waypoint()));

    let presenter = EllipsePresenter::new(host.api().with_selection(center.clone()), &cfg);
    let outcome = presenter.on_edit_center().await.unwrap();

    assert_eq!(outcome.report().unwrap().inserted.len(), 6);
    assert_eq!(host.moves.opened()[0].move_screen_target_label, "ellipse center");
    assert_eq!(
        host.symbols.requests(),
        (0..6).map(|i| format!("Ring{}", i)).collect::<Vec<_>>()
    );
}
