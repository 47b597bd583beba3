//! Feed pages, likes and notifications.

use crate::client::PrimfeedClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, Transport};
use crate::types::{FeedResponse, NotificationsResponse};

impl<T: Transport> PrimfeedClient<T> {
    /// One page of the feed identified by `id`.
    ///
    /// Pages carry no cursor: callers increment `page` until
    /// `FeedResponse::is_end` reports an empty page.
    pub fn fetch_feed(&self, id: &str, page: u32) -> Result<FeedResponse, ApiError> {
        self.get(&format!("/pf/{id}/feed?page={page}"))
    }

    /// Flip the caller's like on a post.
    ///
    /// The API only exposes a toggle, so the resulting state depends on the
    /// state before the call.
    pub fn toggle_like(&self, post_id: &str) -> Result<(), ApiError> {
        self.send::<()>(HttpMethod::Post, &format!("/pf/post/{post_id}/like"), None, &[])?;
        Ok(())
    }

    /// Like a post that is not yet liked. Same request as `toggle_like`.
    pub fn like(&self, post_id: &str) -> Result<(), ApiError> {
        self.toggle_like(post_id)
    }

    /// Remove a like. Same request as `toggle_like`, so calling it on a post
    /// that is not liked will like it.
    pub fn unlike(&self, post_id: &str) -> Result<(), ApiError> {
        self.toggle_like(post_id)
    }

    /// Number of unread notifications; 0 means nothing new.
    pub fn fetch_notification_count(&self) -> Result<i64, ApiError> {
        self.get("/notifications/count")
    }

    /// Full notification list, also cached on the session.
    pub fn fetch_notifications(&mut self) -> Result<NotificationsResponse, ApiError> {
        let notifications: NotificationsResponse = self.get("/notifications")?;
        self.session_mut().me.notifications = Some(notifications.clone());
        Ok(notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::{client, FakeTransport};

    #[test]
    fn feed_page_is_passed_through() {
        let fake = FakeTransport::default().reply(
            200,
            r#"{"feed":[{"likes":3,"liked":false,"data":{"id":"p1","content":"hello","media":[]}}]}"#,
        );
        let page = client(&fake).fetch_feed("abc", 2).unwrap();
        assert!(!page.is_end());
        assert_eq!(page.feed[0].data.id, "p1");
        assert_eq!(page.feed[0].likes, 3);
        assert_eq!(fake.request(0).url, "http://localhost:3000/pf/abc/feed?page=2");
    }

    #[test]
    fn empty_feed_marks_the_end() {
        let fake = FakeTransport::default().reply(200, r#"{"feed":[]}"#);
        assert!(client(&fake).fetch_feed("abc", 9).unwrap().is_end());
    }

    #[test]
    fn like_and_unlike_hit_the_toggle_endpoint() {
        let fake = FakeTransport::default().reply(200, "").reply(200, "");
        let client = client(&fake);
        client.like("p1").unwrap();
        client.unlike("p1").unwrap();

        for i in 0..2 {
            let req = fake.request(i);
            assert_eq!(req.method, HttpMethod::Post);
            assert_eq!(req.url, "http://localhost:3000/pf/post/p1/like");
        }
    }

    #[test]
    fn like_failure_surfaces() {
        let fake = FakeTransport::default().reply(403, "");
        let err = client(&fake).like("p1").unwrap_err();
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn zero_count_means_nothing_new() {
        let fake = FakeTransport::default().reply(200, "0");
        assert_eq!(client(&fake).fetch_notification_count().unwrap(), 0);
        assert_eq!(fake.request(0).url, "http://localhost:3000/notifications/count");
    }

    #[test]
    fn non_integer_count_is_a_decode_error() {
        let fake = FakeTransport::default().reply(200, r#"{"count":1}"#);
        let err = client(&fake).fetch_notification_count().unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn notifications_replace_cache() {
        let fake = FakeTransport::default()
            .reply(200, r#"{"unreadCount":2,"notifications":[{"type":"like"},{"type":"follow"}]}"#)
            .reply(200, r#"{"unreadCount":0,"notifications":[]}"#);
        let mut client = client(&fake);

        let first = client.fetch_notifications().unwrap();
        assert_eq!(first.notifications.len(), 2);
        assert_eq!(client.session().me.notifications.as_ref(), Some(&first));

        client.fetch_notifications().unwrap();
        let cached = client.session().me.notifications.as_ref().unwrap();
        assert_eq!(cached.unread_count, 0);
        assert!(cached.notifications.is_empty());
    }
}
