//! Translation between the schedule model and its external shapes

pub mod storage;
pub mod wire;

pub use storage::{decode_storage, encode_storage, LegacyRowPolicy, ScheduleRow, StoredShape};
pub use wire::{
    decode_wire, encode_response, encode_wire, ReplaceScheduleRequest, ScheduleDeleteResponse,
    SchedulePayload, ScheduleResponse, UpsertScheduleRequest,
};
