use crate::error::ControlError;

/// One parsed control-channel command (§6). A single write of one byte is
/// a command; any other write size is rejected before the byte is even
/// inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    EnableFilter,
    DisableFilter,
    ReloadRules,
    SnapshotConnections,
}

impl ControlCommand {
    pub fn decode(bytes: &[u8]) -> Result<ControlCommand, ControlError> {
        if bytes.len() != 1 {
            return Err(ControlError::InvalidCommandLength(bytes.len()));
        }
        match bytes[0] {
            b'0' => Ok(ControlCommand::EnableFilter),
            b'1' => Ok(ControlCommand::DisableFilter),
            b'2' => Ok(ControlCommand::ReloadRules),
            b'3' => Ok(ControlCommand::SnapshotConnections),
            other => Err(ControlError::UnknownCommand(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_each_known_byte() {
        assert!(matches!(
            ControlCommand::decode(b"0"),
            Ok(ControlCommand::EnableFilter)
        ));
        assert!(matches!(
            ControlCommand::decode(b"1"),
            Ok(ControlCommand::DisableFilter)
        ));
        assert!(matches!(
            ControlCommand::decode(b"2"),
            Ok(ControlCommand::ReloadRules)
        ));
        assert!(matches!(
            ControlCommand::decode(b"3"),
            Ok(ControlCommand::SnapshotConnections)
        ));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            ControlCommand::decode(b"01"),
            Err(ControlError::InvalidCommandLength(2))
        ));
        assert!(matches!(
            ControlCommand::decode(b""),
            Err(ControlError::InvalidCommandLength(0))
        ));
    }

    #[test]
    fn rejects_unknown_byte() {
        assert!(matches!(
            ControlCommand::decode(b"9"),
            Err(ControlError::UnknownCommand(b'9'))
        ));
    }
}
