//! Command ids and dispatch-level classification
//!
//! The wire keeps separate ids for acknowledged and unacknowledged variants
//! of the same operation, and for the current/default configuration
//! readbacks. [`Request`] collapses each family into one variant with a
//! flag, resolved exactly once at the dispatch boundary; handlers never see
//! raw ids.

/// Wire command ids.
///
/// Ids 0, 20..=25 are outbound-only messages produced by this node; they are
/// listed for completeness and never dispatched as requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandId {
    Printf = 0,
    TerminalCmd = 1,
    SetPose = 2,
    SetPoseAck = 3,
    SetEnuRef = 4,
    GetEnuRef = 5,
    RouteAddPoints = 6,
    RouteRemoveLast = 7,
    RouteClear = 8,
    RouteGetSegment = 9,
    ApSetActive = 10,
    RouteReplace = 11,
    RouteSyncPoint = 12,
    RtcmData = 13,
    SetYawOffset = 14,
    SetYawOffsetAck = 15,
    SetConfig = 16,
    GetConfig = 17,
    GetConfigDefault = 18,
    Heartbeat = 19,
    LogLine = 20,
    PlotInit = 21,
    PlotAddGraph = 22,
    PlotSetGraph = 23,
    PlotData = 24,
    NmeaRadio = 25,
}

/// One inbound operation, with wire-variant flags resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Heartbeat,
    Terminal,
    SetPose { ack: bool },
    SetEnuRef,
    GetEnuRef,
    AddRoutePoints,
    RemoveLastRoutePoint,
    ClearRoute,
    GetRouteSegment,
    SetApActive,
    ReplaceRoute,
    SyncPoint,
    RtcmIn,
    SetYawOffset { ack: bool },
    SetConfig,
    GetConfig { default: bool },
}

impl Request {
    /// Map a raw command id to its request, or `None` for ids the general
    /// table does not handle (unknown ids and outbound-only messages).
    pub fn classify(command: u8) -> Option<Self> {
        Some(match command {
            x if x == CommandId::Heartbeat as u8 => Request::Heartbeat,
            x if x == CommandId::TerminalCmd as u8 => Request::Terminal,
            x if x == CommandId::SetPose as u8 => Request::SetPose { ack: false },
            x if x == CommandId::SetPoseAck as u8 => Request::SetPose { ack: true },
            x if x == CommandId::SetEnuRef as u8 => Request::SetEnuRef,
            x if x == CommandId::GetEnuRef as u8 => Request::GetEnuRef,
            x if x == CommandId::RouteAddPoints as u8 => Request::AddRoutePoints,
            x if x == CommandId::RouteRemoveLast as u8 => Request::RemoveLastRoutePoint,
            x if x == CommandId::RouteClear as u8 => Request::ClearRoute,
            x if x == CommandId::RouteGetSegment as u8 => Request::GetRouteSegment,
            x if x == CommandId::ApSetActive as u8 => Request::SetApActive,
            x if x == CommandId::RouteReplace as u8 => Request::ReplaceRoute,
            x if x == CommandId::RouteSyncPoint as u8 => Request::SyncPoint,
            x if x == CommandId::RtcmData as u8 => Request::RtcmIn,
            x if x == CommandId::SetYawOffset as u8 => Request::SetYawOffset { ack: false },
            x if x == CommandId::SetYawOffsetAck as u8 => Request::SetYawOffset { ack: true },
            x if x == CommandId::SetConfig as u8 => Request::SetConfig,
            x if x == CommandId::GetConfig as u8 => Request::GetConfig { default: false },
            x if x == CommandId::GetConfigDefault as u8 => Request::GetConfig { default: true },
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_variants_collapse() {
        assert_eq!(
            Request::classify(CommandId::SetPose as u8),
            Some(Request::SetPose { ack: false })
        );
        assert_eq!(
            Request::classify(CommandId::SetPoseAck as u8),
            Some(Request::SetPose { ack: true })
        );
        assert_eq!(
            Request::classify(CommandId::SetYawOffsetAck as u8),
            Some(Request::SetYawOffset { ack: true })
        );
        assert_eq!(
            Request::classify(CommandId::GetConfigDefault as u8),
            Some(Request::GetConfig { default: true })
        );
    }

    #[test]
    fn test_outbound_and_unknown_ids_are_not_requests() {
        assert_eq!(Request::classify(CommandId::Printf as u8), None);
        assert_eq!(Request::classify(CommandId::PlotData as u8), None);
        assert_eq!(Request::classify(200), None);
    }
}
