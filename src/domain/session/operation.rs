//! Named hardware operations
//!
//! Every call the lifecycle controller makes against the camera stack has a
//! name, so failures and release warnings can say exactly which step broke.

use std::fmt;

/// Hardware operations in the order a full recording performs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    EnumerateDevices,
    QueryCapability,
    OpenOutputFile,
    CreateInput,
    OpenInput,
    CreatePreviewOutput,
    CreateVideoOutput,
    CreateSession,
    BeginConfig,
    AddInput,
    AddPreviewOutput,
    AddVideoOutput,
    CommitConfig,
    SetStabilization,
    SetColorSpace,
    StartSession,
    StartVideoOutput,
    SetZoomRatio,
    GetZoomRatio,
    QueryZoomRange,
    StopVideoOutput,
    StopSession,
    CloseOutputFile,
    CloseInput,
    ReleasePreviewOutput,
    ReleaseVideoOutput,
    ReleaseSession,
}

/// Fixed teardown order, reverse of acquisition
pub const TEARDOWN_ORDER: &[Operation] = &[
    Operation::StopVideoOutput,
    Operation::StopSession,
    Operation::CloseOutputFile,
    Operation::CloseInput,
    Operation::ReleasePreviewOutput,
    Operation::ReleaseVideoOutput,
    Operation::ReleaseSession,
];

impl Operation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnumerateDevices => "enumerate devices",
            Self::QueryCapability => "query output capability",
            Self::OpenOutputFile => "open output file",
            Self::CreateInput => "create camera input",
            Self::OpenInput => "open camera input",
            Self::CreatePreviewOutput => "create preview output",
            Self::CreateVideoOutput => "create video output",
            Self::CreateSession => "create session",
            Self::BeginConfig => "begin config",
            Self::AddInput => "add input",
            Self::AddPreviewOutput => "add preview output",
            Self::AddVideoOutput => "add video output",
            Self::CommitConfig => "commit config",
            Self::SetStabilization => "set stabilization mode",
            Self::SetColorSpace => "set color space",
            Self::StartSession => "start session",
            Self::StartVideoOutput => "start video output",
            Self::SetZoomRatio => "set zoom ratio",
            Self::GetZoomRatio => "get zoom ratio",
            Self::QueryZoomRange => "query zoom range",
            Self::StopVideoOutput => "stop video output",
            Self::StopSession => "stop session",
            Self::CloseOutputFile => "close output file",
            Self::CloseInput => "close camera input",
            Self::ReleasePreviewOutput => "release preview output",
            Self::ReleaseVideoOutput => "release video output",
            Self::ReleaseSession => "release session",
        }
    }

    /// Whether this step belongs to teardown
    pub fn is_teardown(&self) -> bool {
        TEARDOWN_ORDER.contains(self)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
