use std::sync::Arc;
use std::time::Duration;

use kibitzer_core::{AnalysisEngine, AnalysisStatus, Error, EvaluationRequest, ScoreType};
use kibitzer_engine::{BusyPolicy, ChannelState, EngineConfig, EnginePool};

use crate::helpers::{fast_config, start_client, wait_for_state};

const FEN_A: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const FEN_B: &str = "4k3/8/8/8/8/8/8/4K3 w KQkq - 0 1";
const FEN_C: &str = "8/8/8/8/8/8/8/8 w KQkq - 0 1";

#[tokio::test]
async fn test_queued_requests_are_served_in_order() {
    let (client, mut engine) = start_client(EngineConfig::default()).await;
    let client = Arc::new(client);

    let first = {
        let client = client.clone();
        tokio::spawn(async move { client.evaluate(EvaluationRequest::new(FEN_A).with_depth(8)).await })
    };
    engine.expect_search(FEN_A, 8).await;

    let second = {
        let client = client.clone();
        tokio::spawn(async move { client.evaluate(EvaluationRequest::new(FEN_B).with_depth(4)).await })
    };
    // the second search must wait for the first bestmove
    engine.expect_silence(Duration::from_millis(50)).await;

    engine
        .emit(&["info depth 8 score cp 35 pv e2e4", "bestmove e2e4"])
        .await;
    engine.expect_search(FEN_B, 4).await;
    engine
        .emit(&["info depth 4 score cp -15 pv e1d1", "bestmove e1d1"])
        .await;

    let a = first.await.unwrap().unwrap();
    let b = second.await.unwrap().unwrap();
    assert_eq!(a.fen, FEN_A);
    assert_eq!(a.best_move.as_deref(), Some("e2e4"));
    assert_eq!(a.evaluation.normalized, 0.35);
    assert_eq!(b.fen, FEN_B);
    assert_eq!(b.best_move.as_deref(), Some("e1d1"));
    assert_eq!(b.evaluation.normalized, -0.15);
    wait_for_state(&client, ChannelState::Ready).await;
}

#[tokio::test]
async fn test_multipv_keeps_principal_line() {
    let config = EngineConfig {
        multipv: 2,
        ..Default::default()
    };
    let (client, mut engine) = start_client(config).await;
    let pending = client.evaluate(EvaluationRequest::new(FEN_A).with_depth(12));
    let script = async {
        engine.expect_search(FEN_A, 12).await;
        engine
            .emit(&[
                "info depth 12 multipv 1 score cp 120 pv e2e4",
                "info depth 12 multipv 2 score cp -50 pv a2a3",
                "bestmove e2e4",
            ])
            .await;
    };
    let (analysis, _) = tokio::join!(pending, script);
    let analysis = analysis.unwrap();
    assert_eq!(analysis.best_move.as_deref(), Some("e2e4"));
    assert_eq!(analysis.evaluation.normalized, 1.2);
    assert_eq!(analysis.principal_variation, vec!["e2e4"]);
}

#[tokio::test]
async fn test_reject_policy_fails_fast_while_busy() {
    let config = EngineConfig {
        busy_policy: BusyPolicy::Reject,
        ..Default::default()
    };
    let (client, mut engine) = start_client(config).await;
    let client = Arc::new(client);

    let first = {
        let client = client.clone();
        tokio::spawn(async move { client.evaluate(EvaluationRequest::new(FEN_A).with_depth(6)).await })
    };
    engine.expect_search(FEN_A, 6).await;

    let rejected = client.evaluate(EvaluationRequest::new(FEN_B)).await;
    assert!(matches!(rejected, Err(Error::Busy)));

    engine.emit(&["info depth 6 score cp 20", "bestmove d2d4"]).await;
    assert!(first.await.unwrap().is_ok());

    let next = {
        let client = client.clone();
        tokio::spawn(async move { client.evaluate(EvaluationRequest::new(FEN_C).with_depth(2)).await })
    };
    engine.expect_search(FEN_C, 2).await;
    engine.emit(&["bestmove (none)"]).await;
    let c = next.await.unwrap().unwrap();
    assert!(c.best_move.is_none());
    assert_eq!(c.status, AnalysisStatus::Complete);
}

#[tokio::test]
async fn test_timeout_keeps_last_score_and_drains_stale_bestmove() {
    let (client, mut engine) = start_client(fast_config(150)).await;
    let client = Arc::new(client);

    let slow = {
        let client = client.clone();
        tokio::spawn(async move { client.evaluate(EvaluationRequest::new(FEN_A).with_depth(30)).await })
    };
    engine.expect_search(FEN_A, 30).await;
    engine
        .emit(&["info depth 12 score cp 80 pv d2d4 d7d5"])
        .await;

    let timed_out = slow.await.unwrap().unwrap();
    assert_eq!(timed_out.status, AnalysisStatus::TimedOut);
    assert_eq!(timed_out.evaluation.normalized, 0.8);
    assert_eq!(timed_out.depth_reached, 12);
    assert!(timed_out.best_move.is_none());

    engine.expect("stop").await;
    wait_for_state(&client, ChannelState::Draining).await;

    let next = {
        let client = client.clone();
        tokio::spawn(async move { client.evaluate(EvaluationRequest::new(FEN_B).with_depth(3)).await })
    };
    // nothing new is searched until the stopped search reports
    engine.expect_silence(Duration::from_millis(40)).await;

    engine
        .emit(&["info depth 13 score cp 95 pv d2d4", "bestmove d2d4"])
        .await;
    engine.expect_search(FEN_B, 3).await;
    engine
        .emit(&["info depth 3 score mate -2 pv e1d1", "bestmove e1d1"])
        .await;

    let b = next.await.unwrap().unwrap();
    assert_eq!(b.status, AnalysisStatus::Complete);
    assert_eq!(b.best_move.as_deref(), Some("e1d1"));
    assert_eq!(b.evaluation.score_type, ScoreType::Mate);
    assert_eq!(b.evaluation.normalized, -100.0);
}

#[tokio::test]
async fn test_ignored_stop_closes_channel_instead_of_misattributing() {
    let (client, mut engine) = start_client(fast_config(50)).await;
    let client = Arc::new(client);

    let first = {
        let client = client.clone();
        tokio::spawn(async move { client.evaluate(EvaluationRequest::new(FEN_A).with_depth(30)).await })
    };
    engine.expect_search(FEN_A, 30).await;
    assert_eq!(
        first.await.unwrap().unwrap().status,
        AnalysisStatus::TimedOut
    );
    engine.expect("stop").await;

    let second = {
        let client = client.clone();
        tokio::spawn(async move { client.evaluate(EvaluationRequest::new(FEN_B).with_depth(3)).await })
    };

    // the engine never reports the stopped search; the drain window lapses
    assert!(matches!(
        second.await.unwrap(),
        Err(Error::ChannelUnavailable(_))
    ));
    wait_for_state(&client, ChannelState::Closed).await;
    assert_eq!(engine.recv().await, None);
}

#[tokio::test]
async fn test_timeout_without_score_is_neutral() {
    let (client, mut engine) = start_client(fast_config(60)).await;
    let analysis = {
        let pending = client.evaluate(EvaluationRequest::new(FEN_C).with_depth(1));
        let (analysis, _) = tokio::join!(pending, engine.expect_search(FEN_C, 1));
        analysis.unwrap()
    };
    assert_eq!(analysis.status, AnalysisStatus::TimedOut);
    assert_eq!(analysis.evaluation.normalized, 0.0);
    assert_eq!(analysis.depth_reached, 0);
}

#[tokio::test]
async fn test_closed_channel_fails_active_and_queued() {
    let (client, mut engine) = start_client(EngineConfig::default()).await;
    let client = Arc::new(client);

    let first = {
        let client = client.clone();
        tokio::spawn(async move { client.evaluate(EvaluationRequest::new(FEN_A)).await })
    };
    engine.expect_search(FEN_A, 15).await;
    let second = {
        let client = client.clone();
        tokio::spawn(async move { client.evaluate(EvaluationRequest::new(FEN_B)).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    drop(engine);

    assert!(matches!(
        first.await.unwrap(),
        Err(Error::ChannelUnavailable(_))
    ));
    assert!(matches!(
        second.await.unwrap(),
        Err(Error::ChannelUnavailable(_))
    ));
    wait_for_state(&client, ChannelState::Closed).await;

    let late = client.evaluate(EvaluationRequest::new(FEN_C)).await;
    assert!(matches!(late, Err(Error::ChannelUnavailable(_))));
    let neutral = client.evaluate_or_neutral(EvaluationRequest::new(FEN_C)).await;
    assert_eq!(neutral.status, AnalysisStatus::Unavailable);
    assert_eq!(neutral.evaluation.normalized, 0.0);
}

#[tokio::test]
async fn test_abandoned_queued_request_is_skipped() {
    let (client, mut engine) = start_client(EngineConfig::default()).await;
    let client = Arc::new(client);

    let first = {
        let client = client.clone();
        tokio::spawn(async move { client.evaluate(EvaluationRequest::new(FEN_A)).await })
    };
    engine.expect_search(FEN_A, 15).await;

    let abandoned = {
        let client = client.clone();
        tokio::spawn(async move { client.evaluate(EvaluationRequest::new(FEN_B)).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    abandoned.abort();

    let third = {
        let client = client.clone();
        tokio::spawn(async move { client.evaluate(EvaluationRequest::new(FEN_C).with_depth(5)).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    engine.emit(&["bestmove e2e4"]).await;
    engine.expect_search(FEN_C, 5).await;
    engine.emit(&["info depth 5 score cp 0", "bestmove (none)"]).await;

    assert!(first.await.unwrap().is_ok());
    assert_eq!(third.await.unwrap().unwrap().fen, FEN_C);
}

#[tokio::test]
async fn test_shutdown_quits_and_fails_pending() {
    let (client, mut engine) = start_client(EngineConfig::default()).await;
    let client = Arc::new(client);

    let pending = {
        let client = client.clone();
        tokio::spawn(async move { client.evaluate(EvaluationRequest::new(FEN_A)).await })
    };
    engine.expect_search(FEN_A, 15).await;

    AnalysisEngine::shutdown(client.as_ref()).await.unwrap();
    engine.expect("quit").await;
    assert!(matches!(
        pending.await.unwrap(),
        Err(Error::ChannelUnavailable(_))
    ));
    wait_for_state(&client, ChannelState::Closed).await;
}

#[tokio::test]
async fn test_pool_spreads_concurrent_requests() {
    let (a, mut engine_a) = start_client(EngineConfig::default()).await;
    let (b, mut engine_b) = start_client(EngineConfig::default()).await;
    let pool = Arc::new(EnginePool::from_clients(vec![a, b]));

    let first = {
        let pool = pool.clone();
        tokio::spawn(async move { pool.evaluate(EvaluationRequest::new(FEN_A).with_depth(2)).await })
    };
    engine_a.expect_search(FEN_A, 2).await;

    let second = {
        let pool = pool.clone();
        tokio::spawn(async move { pool.evaluate(EvaluationRequest::new(FEN_B).with_depth(2)).await })
    };
    engine_b.expect_search(FEN_B, 2).await;

    engine_b.emit(&["info depth 2 score cp 10", "bestmove e1e2"]).await;
    engine_a.emit(&["info depth 2 score cp 30", "bestmove e2e4"]).await;

    assert_eq!(second.await.unwrap().unwrap().best_move.as_deref(), Some("e1e2"));
    assert_eq!(first.await.unwrap().unwrap().best_move.as_deref(), Some("e2e4"));
    pool.shutdown().await.unwrap();
}
