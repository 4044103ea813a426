// Marker for the version-independent representation of a custom resource.
// Every served version converts into its Hub, and controllers only ever
// reason about the Hub.
pub trait Hub {}
