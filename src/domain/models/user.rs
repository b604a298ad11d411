/// Proof of a successful login. The chat view can only be started with one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub name: String,
    pub email: String,
}
