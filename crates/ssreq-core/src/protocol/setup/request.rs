use super::layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    HostToDevice,
    DeviceToHost,
}

impl Direction {
    pub fn from_request_type(request_type: u8) -> Self {
        if request_type & layout::DIRECTION_MASK != 0 {
            Direction::DeviceToHost
        } else {
            Direction::HostToDevice
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Standard,
    Class,
    Vendor,
    Reserved,
}

impl RequestKind {
    pub fn from_request_type(request_type: u8) -> Self {
        match (request_type & layout::KIND_MASK) >> layout::KIND_SHIFT {
            0 => RequestKind::Standard,
            1 => RequestKind::Class,
            2 => RequestKind::Vendor,
            _ => RequestKind::Reserved,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipient {
    Device,
    Interface,
    Endpoint,
    Other,
    Reserved(u8),
}

impl Recipient {
    pub fn from_request_type(request_type: u8) -> Self {
        match request_type & layout::RECIPIENT_MASK {
            0 => Recipient::Device,
            1 => Recipient::Interface,
            2 => Recipient::Endpoint,
            3 => Recipient::Other,
            other => Recipient::Reserved(other),
        }
    }
}

/// Standard request codes (USB 3.2 table 9-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StandardRequest {
    GetStatus = 0,
    ClearFeature = 1,
    SetFeature = 3,
    SetAddress = 5,
    GetDescriptor = 6,
    SetDescriptor = 7,
    GetConfiguration = 8,
    SetConfiguration = 9,
    GetInterface = 10,
    SetInterface = 11,
    SynchFrame = 12,
    SetSel = 48,
    SetIsochDelay = 49,
}

impl TryFrom<u8> for StandardRequest {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        let request = match code {
            0 => StandardRequest::GetStatus,
            1 => StandardRequest::ClearFeature,
            3 => StandardRequest::SetFeature,
            5 => StandardRequest::SetAddress,
            6 => StandardRequest::GetDescriptor,
            7 => StandardRequest::SetDescriptor,
            8 => StandardRequest::GetConfiguration,
            9 => StandardRequest::SetConfiguration,
            10 => StandardRequest::GetInterface,
            11 => StandardRequest::SetInterface,
            12 => StandardRequest::SynchFrame,
            48 => StandardRequest::SetSel,
            49 => StandardRequest::SetIsochDelay,
            other => return Err(other),
        };
        Ok(request)
    }
}
