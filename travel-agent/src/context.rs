use travel_core::{Content, InvocationContext as InvocationContextTrait, UserProfile};

/// Concrete per-invocation context built by the runner. One is created for
/// every request and dropped when the invocation completes.
pub struct InvocationContext {
    invocation_id: String,
    app_name: String,
    user_content: Content,
    profile: UserProfile,
}

impl InvocationContext {
    pub fn new(
        invocation_id: String,
        app_name: String,
        user_content: Content,
        profile: UserProfile,
    ) -> Self {
        Self { invocation_id, app_name, user_content, profile }
    }
}

impl InvocationContextTrait for InvocationContext {
    fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    fn app_name(&self) -> &str {
        &self.app_name
    }

    fn user_content(&self) -> &Content {
        &self.user_content
    }

    fn profile(&self) -> &UserProfile {
        &self.profile
    }
}
