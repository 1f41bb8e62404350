use cadcore::{
    ac::Identity,
    calendar::{
        Calendar,
        WeekStart,
    },
    completion::UncheckPolicy,
    goal::GoalFields,
    task::{
        Recurrence,
        Task,
        TaskFields,
        TaskOrder,
        TaskQuery,
        TaskStatus,
    },
};
use cadctrl::error::PlatformError;
use chrono::{
    FixedOffset,
    NaiveDate,
    TimeZone,
};

use test_cad::{
    chrono::set_timestamp,
    ctrl::{
        create_sqlite_platform,
        create_sqlite_platform_with_admin,
    },
    is_send_sync,
};

// Friday, 2024-03-01T10:00:00Z
const NOW: i64 = 1709287200;
const DAY: i64 = 86400;

fn ts(y: i32, m: u32, d: u32, h: u32) -> i64 {
    FixedOffset::east_opt(0)
        .expect("zero offset")
        .with_ymd_and_hms(y, m, d, h, 0, 0)
        .single()
        .expect("valid test date")
        .timestamp()
}

fn ids(tasks: &[Task]) -> Vec<i64> {
    tasks.iter().map(|t| t.id).collect()
}

#[async_std::test]
async fn registration_gate() -> anyhow::Result<()> {
    let platform = create_sqlite_platform(
        Calendar::default(),
        UncheckPolicy::default(),
    ).await?;
    assert_eq!(platform.ac_platform.user_count().await?, 0);
    assert!(matches!(
        platform.register_admin("", "admin", "Admin").await,
        Err(PlatformError::Access(cadac::error::Error::Validation(_))),
    ));
    let identity = platform.register_admin("admin@example.com", "admin", "Admin").await?;
    assert_eq!(identity.email, "admin@example.com");
    assert_eq!(platform.ac_platform.user_count().await?, 1);
    assert!(matches!(
        platform.register_admin("second@example.com", "admin", "Second").await,
        Err(PlatformError::Access(cadac::error::Error::Conflict(_))),
    ));
    assert_eq!(platform.ac_platform.user_count().await?, 1);
    Ok(())
}

#[async_std::test]
async fn session_gate() -> anyhow::Result<()> {
    let (platform, identity) = create_sqlite_platform_with_admin().await?;
    assert!(matches!(
        platform.user_ctrl(None).await,
        Err(PlatformError::Unauthorized),
    ));
    assert!(matches!(
        platform.user_ctrl(Some(Default::default())).await,
        Err(PlatformError::Unauthorized),
    ));
    assert!(platform.login("admin@example.com", "wrong", "test".into()).await.is_err());

    let session = platform.login("admin@example.com", "admin", "test".into()).await?;
    let token = session.token();
    let ctrl = platform.user_ctrl(Some(token)).await?;
    assert_eq!(ctrl.identity(), &identity);

    assert!(platform.logout(token).await?);
    assert!(!platform.logout(token).await?);
    assert!(matches!(
        platform.user_ctrl(Some(token)).await,
        Err(PlatformError::Unauthorized),
    ));
    Ok(())
}

#[async_std::test]
async fn daily_scenario() -> anyhow::Result<()> {
    set_timestamp(NOW);
    let (platform, identity) = create_sqlite_platform_with_admin().await?;
    let ctrl = platform.authorize(identity);

    let mut task = ctrl.create_task(
        TaskFields::new("Stretch").recurrence(Recurrence::Daily)
    ).await?;
    assert!(task.task().completions().is_empty());
    assert!(!task.is_completed_now());

    let outcome = task.toggle().await?;
    assert!(outcome.completed);
    assert_eq!(task.task().completions().len(), 1);
    assert_eq!(task.task().completions()[0].completed_ts, NOW);
    assert_eq!(task.task().completed_ts, Some(NOW));
    assert_eq!(task.task().status, TaskStatus::Pending);
    assert!(task.is_completed_now());
    assert!(ctrl.is_completed_now(task.id()).await?);

    // later the same day
    set_timestamp(NOW + 3600);
    let outcome = task.toggle().await?;
    assert!(!outcome.completed);
    assert!(outcome.deleted.is_some());
    assert!(task.task().completions().is_empty());
    assert!(!task.is_completed_now());
    Ok(())
}

#[async_std::test]
async fn daily_two_days() -> anyhow::Result<()> {
    set_timestamp(NOW - DAY);
    let (platform, identity) = create_sqlite_platform_with_admin().await?;
    let ctrl = platform.authorize(identity);
    let id = ctrl.create_task(
        TaskFields::new("Read").recurrence(Recurrence::Daily)
    ).await?.id();
    assert!(ctrl.toggle_task(id).await?.completed);

    set_timestamp(NOW);
    assert!(!ctrl.is_completed_now(id).await?);
    assert!(ctrl.toggle_task(id).await?.completed);
    assert!(ctrl.is_completed_now(id).await?);

    set_timestamp(NOW + DAY);
    assert!(!ctrl.is_completed_now(id).await?);
    let task = ctrl.get_task(id).await?;
    assert_eq!(task.task().completions().len(), 2);
    Ok(())
}

#[async_std::test]
async fn week_boundary() -> anyhow::Result<()> {
    for (week_start, done_this_week) in [
        (WeekStart::Sunday, true),
        (WeekStart::Monday, false),
    ] {
        // completed on Sunday 2024-03-03
        set_timestamp(ts(2024, 3, 3, 20));
        let platform = create_sqlite_platform(
            Calendar::default().with_week_start(week_start),
            UncheckPolicy::default(),
        ).await?;
        let identity = platform
            .register_admin("admin@example.com", "admin", "Admin")
            .await?;
        let ctrl = platform.authorize(identity);
        let id = ctrl.create_task(
            TaskFields::new("Review").recurrence(Recurrence::Weekly)
        ).await?.id();
        assert!(ctrl.toggle_task(id).await?.completed);

        // checked again on Monday 2024-03-04
        set_timestamp(ts(2024, 3, 4, 8));
        assert_eq!(ctrl.is_completed_now(id).await?, done_this_week);
        let outcome = ctrl.toggle_task(id).await?;
        assert_eq!(outcome.completed, !done_this_week);
    }
    Ok(())
}

#[async_std::test]
async fn once_scenario_asymmetric() -> anyhow::Result<()> {
    set_timestamp(NOW);
    let (platform, identity) = create_sqlite_platform_with_admin().await?;
    let ctrl = platform.authorize(identity);
    let mut task = ctrl.create_task(TaskFields::new("File taxes")).await?;
    assert_eq!(task.task().status, TaskStatus::Pending);

    task.toggle().await?;
    assert_eq!(task.task().status, TaskStatus::Completed);
    assert_eq!(task.task().completed_ts, Some(NOW));
    assert_eq!(task.task().completions().len(), 1);

    task.toggle().await?;
    assert_eq!(task.task().status, TaskStatus::Pending);
    assert_eq!(task.task().completed_ts, None);
    // the record from the first toggle is kept
    assert_eq!(task.task().completions().len(), 1);
    Ok(())
}

#[async_std::test]
async fn once_scenario_symmetric() -> anyhow::Result<()> {
    set_timestamp(NOW);
    let platform = create_sqlite_platform(
        Calendar::default(),
        UncheckPolicy::Symmetric,
    ).await?;
    let identity = platform
        .register_admin("admin@example.com", "admin", "Admin")
        .await?;
    let ctrl = platform.authorize(identity);
    let mut task = ctrl.create_task(TaskFields::new("File taxes")).await?;
    task.toggle().await?;
    assert_eq!(task.task().completions().len(), 1);
    let outcome = task.toggle().await?;
    assert!(!outcome.completed);
    assert_eq!(task.task().status, TaskStatus::Pending);
    assert!(task.task().completions().is_empty());
    Ok(())
}

#[async_std::test]
async fn ownership() -> anyhow::Result<()> {
    let (platform, identity) = create_sqlite_platform_with_admin().await?;
    let ctrl = platform.authorize(identity.clone());
    let task_id = ctrl.create_task(TaskFields::new("Mine")).await?.id();
    let goal_id = ctrl.create_goal(GoalFields::new("Mine")).await?.id;

    let stranger = platform.authorize(Identity {
        id: identity.id + 1,
        name: "Stranger".into(),
        email: "stranger@example.com".into(),
    });
    assert!(matches!(stranger.get_task(task_id).await, Err(PlatformError::NotFound(_))));
    assert!(matches!(stranger.toggle_task(task_id).await, Err(PlatformError::NotFound(_))));
    assert!(matches!(
        stranger.update_task(task_id, TaskFields::new("Theirs")).await,
        Err(PlatformError::NotFound(_)),
    ));
    assert!(matches!(stranger.delete_task(task_id).await, Err(PlatformError::NotFound(_))));
    assert!(matches!(stranger.get_goal(goal_id).await, Err(PlatformError::NotFound(_))));
    assert!(matches!(stranger.delete_goal(goal_id).await, Err(PlatformError::NotFound(_))));
    assert!(stranger.list_tasks(&TaskQuery::new()).await?.is_empty());

    // nothing was touched
    let task = ctrl.get_task(task_id).await?;
    assert_eq!(task.task().title, "Mine");
    assert_eq!(task.task().status, TaskStatus::Pending);
    assert_eq!(ctrl.get_goal(goal_id).await?.title, "Mine");
    Ok(())
}

#[async_std::test]
async fn delete_removes_completions() -> anyhow::Result<()> {
    set_timestamp(NOW);
    let (platform, identity) = create_sqlite_platform_with_admin().await?;
    let ctrl = platform.authorize(identity);
    let mut task = ctrl.create_task(
        TaskFields::new("Stretch").recurrence(Recurrence::Daily)
    ).await?;
    task.toggle().await?;
    set_timestamp(NOW + DAY);
    task.toggle().await?;
    let id = task.id();
    assert_eq!(
        platform.tracking_platform.list_completions_for_task(id).await?.len(),
        2,
    );

    task.delete().await?;
    assert!(platform.tracking_platform.list_completions_for_task(id).await?.is_empty());
    assert!(platform.tracking_platform.list_completions_for_user(ctrl.id(), None).await?.is_empty());
    assert!(matches!(ctrl.get_task(id).await, Err(PlatformError::NotFound(_))));
    assert!(matches!(ctrl.delete_task(id).await, Err(PlatformError::NotFound(_))));
    Ok(())
}

#[async_std::test]
async fn task_listing_and_update() -> anyhow::Result<()> {
    set_timestamp(NOW);
    let (platform, identity) = create_sqlite_platform_with_admin().await?;
    let ctrl = platform.authorize(identity);
    let daily = ctrl.create_task(
        TaskFields::new("Stretch").recurrence(Recurrence::Daily)
    ).await?.id();
    let once = ctrl.create_task(TaskFields::new("File taxes")).await?.id();
    let weekly = ctrl.create_task(
        TaskFields::new("Review").recurrence(Recurrence::Weekly)
    ).await?.id();
    ctrl.toggle_task(once).await?;
    ctrl.toggle_task(daily).await?;

    let query = TaskQuery::new().order(TaskOrder::CreatedAsc);
    assert_eq!(ids(&ctrl.list_tasks(&query).await?), [daily, once, weekly]);
    assert_eq!(
        ids(&ctrl.list_tasks(&query.clone().status(TaskStatus::Completed)).await?),
        [once],
    );
    assert_eq!(
        ids(&ctrl.list_tasks(&query.clone().recurrence(Recurrence::Weekly)).await?),
        [weekly],
    );
    assert_eq!(
        ids(&ctrl.list_tasks_by_completion(&query, true).await?),
        [daily, once],
    );
    assert_eq!(
        ids(&ctrl.list_tasks_by_completion(&query, false).await?),
        [weekly],
    );

    let updated = ctrl.update_task(
        weekly,
        TaskFields::new(" Weekly review ")
            .recurrence(Recurrence::Monthly)
            .due_date(NaiveDate::from_ymd_opt(2024, 3, 31).expect("date")),
    ).await?;
    assert_eq!(updated.task().title, "Weekly review");
    assert_eq!(updated.task().recurrence, Recurrence::Monthly);
    assert!(matches!(
        ctrl.update_task(weekly, TaskFields::new(" ")).await,
        Err(PlatformError::Validation(_)),
    ));

    let summary = ctrl.summary().await?;
    assert_eq!(summary.total, 3);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.completion_rate, 33);
    Ok(())
}

#[async_std::test]
async fn goals() -> anyhow::Result<()> {
    let (platform, identity) = create_sqlite_platform_with_admin().await?;
    let ctrl = platform.authorize(identity);
    let mut ids = Vec::new();
    for title in ["Run a marathon", "Learn Rust", "Read 20 books", "Save more"] {
        ids.push(ctrl.create_goal(GoalFields::new(title)).await?.id);
    }
    let recent = ctrl.recent_goals().await?;
    assert_eq!(
        recent.iter().map(|g| g.title.as_str()).collect::<Vec<_>>(),
        ["Save more", "Read 20 books", "Learn Rust"],
    );
    assert_eq!(ctrl.list_goals(None).await?.len(), 4);

    let goal = ctrl.update_goal(
        ids[0],
        GoalFields::new("Run a half marathon")
            .deadline(NaiveDate::from_ymd_opt(2024, 10, 1).expect("date")),
    ).await?;
    assert_eq!(goal.title, "Run a half marathon");
    assert_eq!(goal.deadline, NaiveDate::from_ymd_opt(2024, 10, 1));

    ctrl.delete_goal(ids[0]).await?;
    assert_eq!(ctrl.list_goals(None).await?.len(), 3);
    Ok(())
}

#[async_std::test]
async fn aggregations() -> anyhow::Result<()> {
    let (platform, identity) = create_sqlite_platform_with_admin().await?;
    let ctrl = platform.authorize(identity);
    let daily = ctrl.create_task(
        TaskFields::new("Stretch").recurrence(Recurrence::Daily)
    ).await?.id();
    let monthly = ctrl.create_task(
        TaskFields::new("Budget").recurrence(Recurrence::Monthly)
    ).await?.id();
    for when in [ts(2024, 1, 15, 9), ts(2024, 2, 29, 9), ts(2024, 3, 1, 9)] {
        set_timestamp(when);
        ctrl.toggle_task(daily).await?;
        ctrl.toggle_task(monthly).await?;
    }
    set_timestamp(NOW);

    let heatmap = ctrl.heatmap(2024).await?;
    assert_eq!(heatmap.len(), 366);
    assert_eq!(heatmap.iter().map(|d| d.count).sum::<usize>(), 6);
    assert_eq!(heatmap.iter().filter(|d| d.count == 2).count(), 3);

    let trend = ctrl.trend().await?;
    assert_eq!(trend.len(), 12);
    let last = trend.last().expect("twelve months");
    assert_eq!((last.year, last.month), (2024, 3));
    assert_eq!(last.counts.get(&Recurrence::Daily), Some(&1));
    assert_eq!(last.counts.get(&Recurrence::Monthly), Some(&1));
    let first = trend.first().expect("twelve months");
    assert_eq!((first.year, first.month), (2023, 4));
    assert_eq!(first.counts.get(&Recurrence::Daily), Some(&0));

    let agenda = ctrl.agenda(None).await?;
    assert_eq!(agenda.iter().map(|t| t.id).collect::<Vec<_>>(), [daily]);
    Ok(())
}

#[async_std::test]
async fn test_send_sync_platform() -> anyhow::Result<()> {
    let (platform, _) = create_sqlite_platform_with_admin().await?;
    is_send_sync(&platform);
    Ok(())
}
