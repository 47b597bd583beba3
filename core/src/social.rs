//! Profiles and the follow graph.

use tracing::debug;

use crate::client::PrimfeedClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, Transport};
use crate::types::{Follower, MyProfile, Profile, UserProfile};

impl<T: Transport> PrimfeedClient<T> {
    /// Everyone following `handle`, in one response.
    pub fn fetch_followers(&self, handle: &str) -> Result<Vec<Follower>, ApiError> {
        self.get(&format!("/entity/{handle}/followers"))
    }

    /// Everyone `handle` follows, in one response.
    pub fn fetch_following(&self, handle: &str) -> Result<Vec<Follower>, ApiError> {
        self.get(&format!("/entity/{handle}/followed"))
    }

    /// Load the caller's profile, followers and following into the session.
    ///
    /// The cache is only replaced once all three fetches succeed, so a
    /// failure leaves the previous values in place.
    pub fn fetch_me(&mut self) -> Result<&Profile, ApiError> {
        let profile: Profile = self.get("/me")?;
        let handle = profile.user.handle.as_str();
        let followers = self.fetch_followers(handle)?;
        let following = self.fetch_following(handle)?;
        debug!(
            handle,
            followers = followers.len(),
            following = following.len(),
            "profile loaded"
        );

        let me = &mut self.session_mut().me;
        me.followers = followers;
        me.following = following;
        Ok(&*me.profile.insert(profile))
    }

    pub fn fetch_user_profile(&self, handle: &str) -> Result<UserProfile, ApiError> {
        self.get(&format!("/entity/{handle}"))
    }

    /// Whether `handle` follows `target`, comparing handles case-insensitively.
    pub fn is_following(&self, handle: &str, target: &str) -> Result<bool, ApiError> {
        let target = target.to_lowercase();
        Ok(self
            .fetch_following(handle)?
            .iter()
            .any(|f| f.user.handle.to_lowercase() == target))
    }

    pub fn follow_by_id(&self, id: &str) -> Result<(), ApiError> {
        self.send::<()>(HttpMethod::Post, &format!("/follow/{id}"), None, &[])?;
        Ok(())
    }

    pub fn unfollow_by_id(&self, id: &str) -> Result<(), ApiError> {
        self.send::<()>(HttpMethod::Delete, &format!("/follow/{id}"), None, &[])?;
        Ok(())
    }

    /// Resolve `handle` to an id, then follow it.
    pub fn follow_user(&self, handle: &str) -> Result<(), ApiError> {
        let profile = self.fetch_user_profile(handle)?;
        self.follow_by_id(&profile.user.id)
    }

    /// Resolve `handle` to an id, then unfollow it.
    pub fn unfollow_user(&self, handle: &str) -> Result<(), ApiError> {
        let profile = self.fetch_user_profile(handle)?;
        self.unfollow_by_id(&profile.user.id)
    }

    /// Update the caller's own profile. Requires a prior `fetch_me`.
    pub fn update_profile(&self, update: &MyProfile) -> Result<(), ApiError> {
        let handle = self
            .session()
            .me
            .handle()
            .ok_or(ApiError::ProfileNotLoaded)?;
        self.send(HttpMethod::Patch, &format!("/entity/{handle}"), Some(update), &[])?;
        Ok(())
    }
}
