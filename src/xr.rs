//! AR runtime boundary.
//!
//! The device AR runtime (session negotiation and pose tracking) lives
//! behind [`XrSessionProvider`]. [`XrRuntime`] owns the provider and the
//! currently bound session; while a session is bound the per-frame systems
//! copy the viewer pose onto the [`XrCamera`].

use bevy::prelude::*;
use log::debug;
use thiserror::Error;

use crate::components::XrCamera;

/// Feature the game cannot run without: hit testing against the real world.
pub const FEATURE_HIT_TEST: &str = "hit-test";
/// Feature the game cannot run without: a local reference space.
pub const FEATURE_LOCAL: &str = "local";
/// Feature used when available: tracked hands.
pub const FEATURE_HAND_TRACKING: &str = "hand-tracking";

/// Kind of AR session requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Full-screen camera passthrough with world tracking.
    ImmersiveAr,
}

/// Coordinate frame poses are reported in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferenceSpace {
    /// Origin near the viewer at session start.
    #[default]
    Local,
}

/// Parameters of a session request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    /// Session kind.
    pub mode: SessionMode,
    /// Features the runtime must grant.
    pub required_features: Vec<String>,
    /// Features the runtime may grant.
    pub optional_features: Vec<String>,
    /// Frame for viewer poses.
    pub reference_space: ReferenceSpace,
}

impl SessionRequest {
    /// The request the game makes: immersive AR with hit testing in a local
    /// space, hand tracking if offered.
    #[must_use]
    pub fn immersive_ar() -> Self {
        Self {
            mode: SessionMode::ImmersiveAr,
            required_features: vec![FEATURE_HIT_TEST.to_owned(), FEATURE_LOCAL.to_owned()],
            optional_features: vec![FEATURE_HAND_TRACKING.to_owned()],
            reference_space: ReferenceSpace::Local,
        }
    }
}

/// A granted AR session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrSession {
    /// Features the runtime enabled, required ones first.
    pub enabled_features: Vec<String>,
    /// Frame for viewer poses.
    pub reference_space: ReferenceSpace,
}

/// Reasons an AR session could not be obtained.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum XrError {
    /// The device or browser has no AR support.
    #[error("immersive AR is not supported on this device")]
    Unsupported,
    /// The user declined the camera/motion permission prompt.
    #[error("permission to start an AR session was denied")]
    PermissionDenied,
    /// A required feature is unavailable.
    #[error("required AR feature `{feature}` is unavailable")]
    MissingFeature {
        /// Name of the missing feature.
        feature: String,
    },
    /// The runtime reported some other failure.
    #[error("AR runtime failure: {detail}")]
    Runtime {
        /// Runtime-provided description.
        detail: String,
    },
}

/// Device AR runtime.
#[cfg_attr(test, mockall::automock)]
pub trait XrSessionProvider: Send + Sync {
    /// Negotiates a session.
    ///
    /// # Errors
    /// Returns an [`XrError`] when the runtime refuses the request.
    fn request_session(&mut self, request: &SessionRequest) -> Result<XrSession, XrError>;

    /// Viewer pose for the current frame, if tracking is available.
    fn viewer_pose(&mut self) -> Option<Transform>;

    /// Tears down the current session.
    fn end_session(&mut self);
}

/// Desktop stand-in for an AR runtime.
///
/// Grants every request whose required features it lists and reports a
/// fixed viewer pose while a session is live.
#[derive(Debug, Clone)]
pub struct SimulatedXr {
    supported_features: Vec<String>,
    pose: Transform,
    live: bool,
}

impl Default for SimulatedXr {
    fn default() -> Self {
        Self {
            supported_features: vec![FEATURE_HIT_TEST.to_owned(), FEATURE_LOCAL.to_owned()],
            pose: Transform::IDENTITY,
            live: false,
        }
    }
}

impl SimulatedXr {
    /// Reports `pose` as the viewer pose.
    #[must_use]
    pub fn with_pose(mut self, pose: Transform) -> Self {
        self.pose = pose;
        self
    }

    /// Replaces the list of supported features.
    #[must_use]
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_features = features.into_iter().map(Into::into).collect();
        self
    }
}

impl XrSessionProvider for SimulatedXr {
    fn request_session(&mut self, request: &SessionRequest) -> Result<XrSession, XrError> {
        if let Some(missing) = request
            .required_features
            .iter()
            .find(|feature| !self.supported_features.contains(*feature))
        {
            return Err(XrError::MissingFeature {
                feature: missing.clone(),
            });
        }
        let enabled_features = request
            .required_features
            .iter()
            .chain(
                request
                    .optional_features
                    .iter()
                    .filter(|feature| self.supported_features.contains(*feature)),
            )
            .cloned()
            .collect();
        self.live = true;
        Ok(XrSession {
            enabled_features,
            reference_space: request.reference_space,
        })
    }

    fn viewer_pose(&mut self) -> Option<Transform> {
        self.live.then_some(self.pose)
    }

    fn end_session(&mut self) {
        self.live = false;
    }
}

/// Runtime for devices without AR: every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableXr;

impl XrSessionProvider for UnavailableXr {
    fn request_session(&mut self, _request: &SessionRequest) -> Result<XrSession, XrError> {
        Err(XrError::Unsupported)
    }

    fn viewer_pose(&mut self) -> Option<Transform> {
        None
    }

    fn end_session(&mut self) {}
}

/// The AR provider and the session currently bound to the renderer.
#[derive(Resource)]
pub struct XrRuntime {
    provider: Box<dyn XrSessionProvider>,
    session: Option<XrSession>,
}

impl Default for XrRuntime {
    fn default() -> Self {
        Self::new(SimulatedXr::default())
    }
}

impl XrRuntime {
    /// Wraps `provider` with no session bound.
    #[must_use]
    pub fn new(provider: impl XrSessionProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            session: None,
        }
    }

    /// Requests a session and binds it on success.
    ///
    /// # Errors
    /// Propagates the provider's [`XrError`]. No retry is attempted.
    pub fn start(&mut self, request: &SessionRequest) -> Result<&XrSession, XrError> {
        let session = self.provider.request_session(request)?;
        Ok(self.session.insert(session))
    }

    /// Ends and unbinds the current session, if any.
    pub fn end(&mut self) {
        if self.session.take().is_some() {
            self.provider.end_session();
            debug!("AR session ended");
        }
    }

    /// Currently bound session.
    #[must_use]
    pub const fn session(&self) -> Option<&XrSession> {
        self.session.as_ref()
    }

    /// Whether a session is bound.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.session.is_some()
    }

    /// Viewer pose for this frame while a session is bound.
    pub fn viewer_pose(&mut self) -> Option<Transform> {
        if self.session.is_none() {
            return None;
        }
        self.provider.viewer_pose()
    }
}

/// Run condition: an AR session is bound to the renderer.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy run conditions take `Res<T>` by value."
)]
#[must_use]
pub fn xr_session_bound(runtime: Res<XrRuntime>) -> bool {
    runtime.is_bound()
}

/// Copies the viewer pose onto the XR camera.
pub fn sync_viewer_pose_system(
    mut runtime: ResMut<XrRuntime>,
    mut camera: Query<&mut Transform, With<XrCamera>>,
) {
    let Some(pose) = runtime.viewer_pose() else {
        return;
    };
    if let Ok(mut transform) = camera.single_mut() {
        *transform = pose;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn immersive_request_names_required_features() {
        let request = SessionRequest::immersive_ar();
        assert_eq!(request.required_features, vec!["hit-test", "local"]);
        assert_eq!(request.optional_features, vec!["hand-tracking"]);
        assert_eq!(request.reference_space, ReferenceSpace::Local);
    }

    #[rstest]
    fn simulated_runtime_grants_supported_request() {
        let mut xr = SimulatedXr::default();
        let session = xr
            .request_session(&SessionRequest::immersive_ar())
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(session.enabled_features, vec!["hit-test", "local"]);
        assert!(xr.viewer_pose().is_some());
    }

    #[rstest]
    fn simulated_runtime_enables_offered_optional_features() {
        let mut xr = SimulatedXr::default().with_features(["hit-test", "local", "hand-tracking"]);
        let session = xr
            .request_session(&SessionRequest::immersive_ar())
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(session.enabled_features.iter().any(|f| f == "hand-tracking"));
    }

    #[rstest]
    fn simulated_runtime_reports_missing_feature() {
        let mut xr = SimulatedXr::default().with_features(["local"]);
        assert_eq!(
            xr.request_session(&SessionRequest::immersive_ar()),
            Err(XrError::MissingFeature {
                feature: "hit-test".to_owned()
            })
        );
        assert!(xr.viewer_pose().is_none());
    }

    #[rstest]
    fn unavailable_runtime_always_fails() {
        let mut runtime = XrRuntime::new(UnavailableXr);
        assert_eq!(
            runtime.start(&SessionRequest::immersive_ar()).err(),
            Some(XrError::Unsupported)
        );
        assert!(!runtime.is_bound());
    }

    #[rstest]
    fn runtime_forwards_to_provider_once() {
        let mut provider = MockXrSessionProvider::new();
        provider.expect_request_session().times(1).returning(|_| {
            Ok(XrSession {
                enabled_features: vec![FEATURE_HIT_TEST.to_owned(), FEATURE_LOCAL.to_owned()],
                reference_space: ReferenceSpace::Local,
            })
        });
        provider
            .expect_viewer_pose()
            .returning(|| Some(Transform::from_xyz(0.0, 1.6, 0.0)));
        provider.expect_end_session().times(1).return_const(());

        let mut runtime = XrRuntime::new(provider);
        assert!(runtime.start(&SessionRequest::immersive_ar()).is_ok());
        assert_eq!(
            runtime.viewer_pose().map(|t| t.translation),
            Some(Vec3::new(0.0, 1.6, 0.0))
        );
        runtime.end();
        runtime.end();
        assert!(runtime.viewer_pose().is_none());
    }

    #[rstest]
    fn runtime_does_not_retry_failed_request() {
        let mut provider = MockXrSessionProvider::new();
        provider
            .expect_request_session()
            .times(1)
            .returning(|_| Err(XrError::PermissionDenied));
        provider.expect_end_session().never();

        let mut runtime = XrRuntime::new(provider);
        assert_eq!(
            runtime.start(&SessionRequest::immersive_ar()).err(),
            Some(XrError::PermissionDenied)
        );
        runtime.end();
    }
}
