mod common;

use anyhow::Result;
use usercenter::messages;
use usercenter::query::SortDirection;
use usercenter::views::admin::{user_management, AdminStats, UserDetailView};
use usercenter::views::MessageKind;

#[tokio::test]
async fn admin_filter_lists_matching_users() -> Result<()> {
    let h = common::harness().await?;
    h.login_as("admin").await?;

    let mut view = user_management(h.client().clone());
    view.apply_filter("is_admin", "true").await?;

    assert_eq!(view.items().len(), 3);
    assert!(view.items().iter().all(|u| u.is_admin));
    assert_eq!(view.total(), 3);
    assert!(view.summary().contains("共 3 条"), "{}", view.summary());

    let seen = h.stub.requests_to("/api/admin/users");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].param("is_admin").as_deref(), Some("true"));
    assert_eq!(seen[0].param("order_by").as_deref(), Some("created_at"));
    assert_eq!(seen[0].param("order_direction").as_deref(), Some("desc"));
    Ok(())
}

#[tokio::test]
async fn changing_a_filter_goes_back_to_the_first_window() -> Result<()> {
    let h = common::harness().await?;
    h.login_as("admin").await?;

    let mut view = user_management(h.client().clone());
    view.query_mut().set_page_size(2)?;
    view.refresh().await?;
    assert_eq!(view.total_pages(), 3);
    assert!(view.change_page(2).await?);
    assert_eq!(h.stub.requests().last().and_then(|s| s.param("skip")).as_deref(), Some("2"));

    h.stub.clear_requests();
    view.apply_filter("is_active", "true").await?;

    let seen = h.stub.requests_to("/api/admin/users");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].param("skip").as_deref(), Some("0"));
    assert_eq!(view.query().page(), 1);
    assert_eq!(view.total(), 4);
    Ok(())
}

#[tokio::test]
async fn sort_toggle_reaches_the_backend() -> Result<()> {
    let h = common::harness().await?;
    h.login_as("admin").await?;

    let mut view = user_management(h.client().clone());
    view.change_sort("username").await?;
    view.change_sort("username").await?;

    assert_eq!(view.query().sort().map(|s| s.direction), Some(SortDirection::Asc));
    let last = h.stub.requests().pop().expect("request");
    assert_eq!(last.param("order_by").as_deref(), Some("username"));
    assert_eq!(last.param("order_direction").as_deref(), Some("asc"));
    Ok(())
}

#[tokio::test]
async fn stats_count_each_flag() -> Result<()> {
    let h = common::harness().await?;
    h.login_as("admin").await?;

    let stats = AdminStats::load(h.client()).await?;

    assert_eq!(stats.total_users, 5);
    assert_eq!(stats.active_users, 4);
    assert_eq!(stats.verified_users, 3);
    assert_eq!(stats.admin_users, 3);
    let seen = h.stub.requests_to("/api/admin/users");
    assert_eq!(seen.len(), 4);
    assert!(seen.iter().all(|s| s.param("limit").as_deref() == Some("1")));
    Ok(())
}

#[tokio::test]
async fn non_admin_listing_is_rejected_without_sign_out() -> Result<()> {
    let h = common::harness().await?;
    h.login_as("mei").await?;

    let mut view = user_management(h.client().clone());
    let err = view.refresh().await.unwrap_err();

    assert_eq!(err.status_code(), Some(403));
    assert!(!view.is_loaded());
    assert!(h.client().cache().get_token().is_some());
    Ok(())
}

#[tokio::test]
async fn user_detail_loads_history_and_toggles() -> Result<()> {
    let h = common::harness().await?;
    h.login_as("admin").await?;

    let mut detail = UserDetailView::new(h.client().clone(), 3);
    detail.load().await?;
    assert_eq!(detail.user.as_ref().map(|u| u.is_active), Some(false));
    assert_eq!(detail.login_history.len(), 10);
    assert_eq!(detail.activity_history.len(), 10);

    detail.change_history_page(2).await?;
    assert_eq!(detail.login_history.len(), 2);

    detail.set_active(true).await?;
    assert_eq!(detail.user.as_ref().map(|u| u.is_active), Some(true));
    let status = detail.status.clone().expect("banner");
    assert_eq!(status.kind, MessageKind::Success);
    assert_eq!(status.text, "用户已激活");

    detail.set_admin(true).await?;
    assert_eq!(detail.user.as_ref().map(|u| u.is_admin), Some(true));
    assert_eq!(detail.status.as_ref().map(|s| s.text.as_str()), Some("用户已设为管理员"));

    let seen = h.stub.requests_to("/api/admin/users/3/status");
    assert_eq!(seen[0].method, "PUT");
    Ok(())
}

#[tokio::test]
async fn user_detail_opens_on_requested_history_page() -> Result<()> {
    let h = common::harness().await?;
    h.login_as("admin").await?;
    h.stub.clear_requests();

    let mut detail = UserDetailView::new(h.client().clone(), 3);
    detail.history_page = 2;
    detail.load().await?;

    assert_eq!(detail.login_history.len(), 2);
    assert_eq!(detail.activity_history.len(), 2);
    for path in ["/api/admin/users/3/login-history", "/api/admin/users/3/activity-history"] {
        let seen = h.stub.requests_to(path);
        assert_eq!(seen.len(), 1, "{}", path);
        assert_eq!(seen[0].param("skip").as_deref(), Some("10"));
    }
    Ok(())
}

#[tokio::test]
async fn missing_user_reports_load_failure() -> Result<()> {
    let h = common::harness().await?;
    h.login_as("admin").await?;

    let mut detail = UserDetailView::new(h.client().clone(), 42);
    let err = detail.load().await.unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert!(detail.user.is_none());
    assert_eq!(
        detail.status.as_ref().map(|s| s.text.as_str()),
        Some(messages::LOAD_USER_FAILED)
    );

    let err = detail.set_admin(true).await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(
        detail.status.as_ref().map(|s| s.text.as_str()),
        Some(messages::USER_ROLE_FAILED)
    );
    Ok(())
}
