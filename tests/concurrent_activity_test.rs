// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::collections::HashSet;
use std::sync::Arc;
use watch_activity::db::MemoryDb;
use watch_activity::models::{ActivityAddRequest, ActivityType};
use watch_activity::services::ActivityService;

const NUM_CONCURRENT_ADDS: u64 = 50;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_for_same_item() {
    // Every concurrent add is an independent history row: none may be lost
    // and no two may share an id.
    let service = ActivityService::new(Arc::new(MemoryDb::new()));

    let mut handles = vec![];
    for i in 0..NUM_CONCURRENT_ADDS {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .add(
                    1,
                    ActivityAddRequest {
                        watched_id: 42,
                        activity_type: ActivityType::RatingChanged,
                        data: i.to_string(),
                        custom_date: None,
                    },
                )
                .await
        }));
    }

    for handle in handles {
        handle
            .await
            .expect("Task join failed")
            .expect("Activity add failed");
    }

    let activities = service.list(1, 42).await.unwrap();
    assert_eq!(activities.len(), NUM_CONCURRENT_ADDS as usize);

    let ids: HashSet<u64> = activities.iter().map(|a| a.id).collect();
    assert_eq!(ids.len(), NUM_CONCURRENT_ADDS as usize, "Duplicate activity ids");
    assert!(activities.windows(2).all(|w| w[0].id < w[1].id));

    let payloads: HashSet<String> = activities.into_iter().map(|a| a.data).collect();
    assert_eq!(payloads.len(), NUM_CONCURRENT_ADDS as usize);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_across_users_stay_isolated() {
    let service = ActivityService::new(Arc::new(MemoryDb::new()));

    let mut handles = vec![];
    for user_id in 1..=10u64 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..3 {
                service
                    .add(
                        user_id,
                        ActivityAddRequest {
                            watched_id: 7,
                            activity_type: ActivityType::SeasonStatusChanged,
                            data: format!("user-{}", user_id),
                            custom_date: None,
                        },
                    )
                    .await?;
            }
            Ok::<_, watch_activity::error::AppError>(())
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for user_id in 1..=10u64 {
        let activities = service.list(user_id, 7).await.unwrap();
        assert_eq!(activities.len(), 3);
        assert!(activities
            .iter()
            .all(|a| a.user_id == user_id && a.data == format!("user-{}", user_id)));
    }
}
