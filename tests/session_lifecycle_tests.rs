mod common;

use chrono::{Duration, Utc};

use common::{days_ago, insert_session_at, seed_activity, test_store};
use lang_portal_backend::models::{SessionStatus, SessionUpdate};
use lang_portal_backend::ServiceError;

#[tokio::test]
async fn created_session_starts_in_progress() {
    let ts = test_store().await;
    let (_, activity_id) = seed_activity(&ts).await;
    let sessions = ts.state.sessions();

    let before = Utc::now();
    let id = sessions.create_session(activity_id).await.unwrap();
    let session = sessions.get_session(id).await.unwrap();

    assert_eq!(session.id, id);
    assert_eq!(session.status, SessionStatus::InProgress);
    assert_eq!(session.study_activity_id, activity_id);
    assert!(session.end_time.is_none());
    assert!(session.score.is_none());
    assert!(session.start_time >= before - Duration::seconds(1));
    assert!(session.is_consistent());
}

#[tokio::test]
async fn unknown_activity_and_session_are_not_found() {
    let ts = test_store().await;
    let sessions = ts.state.sessions();

    let err = sessions.create_session(4242).await.unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err:?}");

    let err = sessions.get_session(4242).await.unwrap_err();
    assert!(err.is_not_found());

    let err = sessions.end_session(4242, 50.0).await.unwrap_err();
    assert!(err.is_not_found());

    let err = sessions.abandon_session(4242).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn end_session_completes_with_score_and_end_time() {
    let ts = test_store().await;
    let (_, activity_id) = seed_activity(&ts).await;
    let sessions = ts.state.sessions();

    let id = sessions.create_session(activity_id).await.unwrap();
    sessions.end_session(id, 66.7).await.unwrap();

    let session = sessions.get_session(id).await.unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.score, Some(66.7));
    let end = session.end_time.expect("end time recorded");
    assert!(end >= session.start_time);
    assert!(session.is_consistent());
}

#[tokio::test]
async fn ending_a_closed_session_is_rejected() {
    let ts = test_store().await;
    let (_, activity_id) = seed_activity(&ts).await;
    let sessions = ts.state.sessions();

    let id = sessions.create_session(activity_id).await.unwrap();
    sessions.end_session(id, 80.0).await.unwrap();
    let first = sessions.get_session(id).await.unwrap();

    let err = sessions.end_session(id, 10.0).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidTransition {
            from: SessionStatus::Completed,
            to: SessionStatus::Completed
        }
    ));

    // The first completion is untouched.
    assert_eq!(sessions.get_session(id).await.unwrap(), first);
}

#[tokio::test]
async fn abandoned_session_cannot_be_completed() {
    let ts = test_store().await;
    let (_, activity_id) = seed_activity(&ts).await;
    let sessions = ts.state.sessions();

    let id = sessions.create_session(activity_id).await.unwrap();
    sessions.abandon_session(id).await.unwrap();

    let session = sessions.get_session(id).await.unwrap();
    assert_eq!(session.status, SessionStatus::Abandoned);
    assert!(session.end_time.is_none());
    assert!(session.score.is_none());
    assert!(session.is_consistent());

    let err = sessions.end_session(id, 90.0).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidTransition {
            from: SessionStatus::Abandoned,
            to: SessionStatus::Completed
        }
    ));
    let err = sessions.abandon_session(id).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition { .. }));
}

#[tokio::test]
async fn non_finite_score_is_invalid() {
    let ts = test_store().await;
    let (_, activity_id) = seed_activity(&ts).await;
    let sessions = ts.state.sessions();

    let id = sessions.create_session(activity_id).await.unwrap();
    for score in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = sessions.end_session(id, score).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }
    let session = sessions.get_session(id).await.unwrap();
    assert_eq!(session.status, SessionStatus::InProgress);
}

#[tokio::test]
async fn update_session_enforces_completion_invariant() {
    let ts = test_store().await;
    let (_, activity_id) = seed_activity(&ts).await;
    let sessions = ts.state.sessions();
    let id = sessions.create_session(activity_id).await.unwrap();

    let missing_score = SessionUpdate {
        id,
        end_time: Some(Utc::now()),
        score: None,
        status: SessionStatus::Completed,
    };
    let err = sessions.update_session(&missing_score).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));

    let open_with_score = SessionUpdate {
        id,
        end_time: None,
        score: Some(12.0),
        status: SessionStatus::InProgress,
    };
    let err = sessions.update_session(&open_with_score).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));

    assert_eq!(
        sessions.get_session(id).await.unwrap().status,
        SessionStatus::InProgress
    );
}

#[tokio::test]
async fn update_session_writes_fields_of_open_session() {
    let ts = test_store().await;
    let (_, activity_id) = seed_activity(&ts).await;
    let sessions = ts.state.sessions();
    let id = sessions.create_session(activity_id).await.unwrap();

    let mut update = SessionUpdate::from(&sessions.get_session(id).await.unwrap());
    let end = Utc::now() + Duration::minutes(5);
    update.end_time = Some(end);
    update.score = Some(72.5);
    update.status = SessionStatus::Completed;
    sessions.update_session(&update).await.unwrap();

    let session = sessions.get_session(id).await.unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.score, Some(72.5));
    assert_eq!(session.end_time, Some(end));

    // Closed now, so a further overwrite is a rejected transition.
    let err = sessions.update_session(&update).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition { .. }));
}

#[tokio::test]
async fn update_unknown_session_is_not_found() {
    let ts = test_store().await;
    let update = SessionUpdate {
        id: 999,
        end_time: None,
        score: None,
        status: SessionStatus::Abandoned,
    };
    let err = ts.state.sessions().update_session(&update).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn list_sessions_is_newest_first_with_total() {
    let ts = test_store().await;
    let (_, activity_id) = seed_activity(&ts).await;
    let oldest = insert_session_at(&ts, activity_id, days_ago(3), None, None, "in_progress").await;
    let middle = insert_session_at(&ts, activity_id, days_ago(2), None, None, "abandoned").await;
    let newest = insert_session_at(&ts, activity_id, days_ago(1), None, None, "in_progress").await;

    let sessions = ts.state.sessions();
    let (items, total) = sessions.list_sessions(0, 10).await.unwrap();
    assert_eq!(total, 3);
    let ids: Vec<i64> = items.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![newest, middle, oldest]);

    let (items, total) = sessions.list_sessions(1, 1).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, middle);

    let err = sessions.list_sessions(-1, 10).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));
}

#[tokio::test]
async fn session_pages_follow_page_size() {
    let ts = test_store().await;
    let (_, activity_id) = seed_activity(&ts).await;
    let base = Utc::now() - Duration::days(30);
    for i in 0..250 {
        insert_session_at(&ts, activity_id, base + Duration::minutes(i), None, None, "in_progress")
            .await;
    }

    let sessions = ts.state.sessions();
    let third = sessions.list_sessions_page(3).await.unwrap();
    assert_eq!(third.items.len(), 50);
    assert_eq!(third.pagination.total_pages, 3);
    assert_eq!(third.pagination.total_items, 250);
    assert_eq!(third.pagination.current_page, 3);
    assert_eq!(third.pagination.items_per_page, 100);

    let fourth = sessions.list_sessions_page(4).await.unwrap();
    assert!(fourth.items.is_empty());
    assert_eq!(fourth.pagination.total_pages, 3);

    let first = sessions.list_sessions_page(0).await.unwrap();
    assert_eq!(first.pagination.current_page, 1);
    assert_eq!(first.items.len(), 100);
    assert!(first
        .items
        .windows(2)
        .all(|pair| pair[0].start_time >= pair[1].start_time));
}

#[tokio::test]
async fn activity_sessions_are_scoped_to_the_activity() {
    let ts = test_store().await;
    let (group_id, activity_id) = seed_activity(&ts).await;
    let other_activity = ts
        .state
        .catalog()
        .create_activity(group_id, "typing")
        .await
        .unwrap();

    let sessions = ts.state.sessions();
    let first = sessions.create_session(activity_id).await.unwrap();
    let _other = sessions.create_session(other_activity).await.unwrap();
    let second = sessions.create_session(activity_id).await.unwrap();

    let listed: Vec<i64> = sessions
        .list_activity_sessions(activity_id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(listed.len(), 2);
    assert!(listed.contains(&first));
    assert!(listed.contains(&second));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_close_a_session_exactly_once() {
    let ts = test_store().await;
    let (_, activity_id) = seed_activity(&ts).await;

    for _ in 0..20 {
        let id = ts.state.sessions().create_session(activity_id).await.unwrap();

        let mut handles = Vec::new();
        for n in 0..4 {
            let sessions = ts.state.sessions().clone();
            handles.push(tokio::spawn(async move {
                let update = SessionUpdate {
                    id,
                    end_time: Some(Utc::now()),
                    score: Some(50.0 + n as f64),
                    status: SessionStatus::Completed,
                };
                sessions.update_session(&update).await
            }));
        }

        let mut completed = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => completed += 1,
                Err(ServiceError::InvalidTransition {
                    from: SessionStatus::Completed,
                    to: SessionStatus::Completed,
                }) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(completed, 1);
        assert!(ts.state.sessions().get_session(id).await.unwrap().is_consistent());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_end_and_abandon_leave_one_winner() {
    let ts = test_store().await;
    let (_, activity_id) = seed_activity(&ts).await;
    let id = ts.state.sessions().create_session(activity_id).await.unwrap();

    let ending = ts.state.sessions().clone();
    let abandoning = ts.state.sessions().clone();
    let (ended, abandoned) = tokio::join!(
        tokio::spawn(async move { ending.end_session(id, 88.0).await }),
        tokio::spawn(async move { abandoning.abandon_session(id).await }),
    );
    let (ended, abandoned) = (ended.unwrap(), abandoned.unwrap());

    assert!(ended.is_ok() != abandoned.is_ok());
    let loser = ended.err().or(abandoned.err()).unwrap();
    assert!(matches!(loser, ServiceError::InvalidTransition { .. }), "unexpected error: {loser:?}");
    assert!(ts.state.sessions().get_session(id).await.unwrap().is_consistent());
}
