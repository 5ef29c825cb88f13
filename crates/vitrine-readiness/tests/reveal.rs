//! Page reveal and preloader gating.

mod common;

use std::{sync::Arc, time::Duration};

use common::FakeHost;
use vitrine_readiness::{
    AnimationGate, AnimationOptions, AnimationPlan, DocumentHost, ElementRect, GateOutcome,
    PageReveal, REVEAL_CLASS, ReadyState, Viewport,
};

#[tokio::test(start_paused = true)]
async fn test_reveal_adds_class_once() {
    let host = FakeHost::loaded();
    let reveal = PageReveal::default();

    let report = reveal.run(&host).await.expect("first run reveals");
    assert_eq!(report.style, GateOutcome::Loaded);
    assert_eq!(report.window, GateOutcome::Loaded);
    assert_eq!(report.font, GateOutcome::Loaded);
    assert!(host.has_class(REVEAL_CLASS));

    assert!(reveal.run(&host).await.is_none());
    assert_eq!(host.class_adds(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_reveals_fire_once() {
    let host = FakeHost {
        ready_state: ReadyState::Interactive,
        load_after: Some(Duration::from_millis(50)),
        ..FakeHost::loaded()
    }
    .shared();
    let reveal = Arc::new(PageReveal::default());

    let runs: Vec<_> = (0..3)
        .map(|_| {
            let (host, reveal) = (host.clone(), reveal.clone());
            tokio::spawn(async move { reveal.run(host.as_ref()).await.is_some() })
        })
        .collect();

    let mut fired = 0;
    for run in runs {
        if run.await.expect("join") {
            fired += 1;
        }
    }
    assert_eq!(fired, 1);
    assert_eq!(host.class_adds(), 1);
    reveal.revealed().await;
}

#[tokio::test(start_paused = true)]
async fn test_reveal_always_terminates() {
    let host = FakeHost {
        fonts_ready: common::FontsReady::Never,
        ready_state: ReadyState::Loading,
        load_after: None,
        ..FakeHost::loaded()
    };
    host.sheets.lock().unwrap().clear();

    let report = PageReveal::default().run(&host).await.expect("revealed");
    assert_eq!(report.style, GateOutcome::TimedOut);
    assert_eq!(report.window, GateOutcome::TimedOut);
    assert_eq!(report.font, GateOutcome::TimedOut);
    assert!(host.has_class(REVEAL_CLASS));
}

#[tokio::test(start_paused = true)]
async fn test_animation_waits_for_preloader() {
    let host = FakeHost::loaded().shared();
    let gate = Arc::new(AnimationGate::new());

    let scheduled = {
        let gate = gate.clone();
        tokio::spawn(async move {
            gate.schedule(AnimationOptions::default(), || {
                (
                    Some(ElementRect {
                        top: 50.0,
                        bottom: 400.0,
                    }),
                    Viewport {
                        height: 900.0,
                        scroll_triggers: true,
                    },
                )
            })
            .await
        })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!scheduled.is_finished());

    assert!(gate.mark_preloader_complete(host.as_ref()));
    assert!(!gate.mark_preloader_complete(host.as_ref()));

    assert_eq!(scheduled.await.expect("join"), AnimationPlan::RunNow);
    assert_eq!(host.events(), vec!["preloader-complete".to_string()]);
    assert!(host.has_class("preloader-complete"));
}

#[tokio::test]
async fn test_animation_after_preloader_is_immediate() {
    let host = FakeHost::loaded();
    let gate = AnimationGate::new();
    gate.mark_preloader_complete(&host);

    let plan = gate
        .schedule(AnimationOptions::default(), || {
            (
                None,
                Viewport {
                    height: 900.0,
                    scroll_triggers: false,
                },
            )
        })
        .await;
    assert_eq!(plan, AnimationPlan::RunNow);
}
