//! Classic event-log API (`OpenEventLogW` / `ReadEventLogW`).

use windows_sys::Win32::Foundation::{GetLastError, ERROR_HANDLE_EOF, ERROR_INSUFFICIENT_BUFFER, HANDLE};
use windows_sys::Win32::System::EventLog::{
    CloseEventLog, OpenEventLogW, ReadEventLogW, EVENTLOGRECORD, EVENTLOG_BACKWARDS_READ,
    EVENTLOG_SEQUENTIAL_READ,
};

use super::{NativeEventLog, NativeRecord};
use crate::parser::traits::DecodeError;

const READ_BUFFER: usize = 64 * 1024;

pub struct WindowsEventLog;

struct LogHandle(HANDLE);

impl Drop for LogHandle {
    fn drop(&mut self) {
        // SAFETY: the handle came from a successful OpenEventLogW and is closed once
        unsafe {
            CloseEventLog(self.0);
        }
    }
}

impl NativeEventLog for WindowsEventLog {
    fn read(&self, channel: &str) -> Result<Vec<NativeRecord>, DecodeError> {
        let name: Vec<u16> = channel.encode_utf16().chain(std::iter::once(0)).collect();

        // SAFETY: `name` is NUL-terminated and outlives the call
        let raw = unsafe { OpenEventLogW(std::ptr::null(), name.as_ptr()) };
        if raw.is_null() {
            let code = unsafe { GetLastError() };
            return Err(DecodeError::Native(format!("OpenEventLogW({}) failed with error {}", channel, code)));
        }
        let handle = LogHandle(raw);

        let mut buffer = vec![0u8; READ_BUFFER];
        let mut records = Vec::new();

        loop {
            let mut read = 0u32;
            let mut needed = 0u32;
            // SAFETY: buffer pointer and length describe a live allocation
            let ok = unsafe {
                ReadEventLogW(
                    handle.0,
                    EVENTLOG_SEQUENTIAL_READ | EVENTLOG_BACKWARDS_READ,
                    0,
                    buffer.as_mut_ptr().cast(),
                    buffer.len() as u32,
                    &mut read,
                    &mut needed,
                )
            };

            if ok == 0 {
                match unsafe { GetLastError() } {
                    ERROR_HANDLE_EOF => break,
                    ERROR_INSUFFICIENT_BUFFER => {
                        buffer.resize(needed as usize, 0);
                        continue;
                    }
                    code => {
                        return Err(DecodeError::Native(format!("ReadEventLogW failed with error {}", code)));
                    }
                }
            }

            parse_records(&buffer[..read as usize], &mut records);
        }

        Ok(records)
    }
}

fn parse_records(buf: &[u8], out: &mut Vec<NativeRecord>) {
    let header = std::mem::size_of::<EVENTLOGRECORD>();
    let mut offset = 0;

    while offset + header <= buf.len() {
        // SAFETY: at least `header` bytes remain; read_unaligned has no alignment requirement
        let rec: EVENTLOGRECORD = unsafe { std::ptr::read_unaligned(buf[offset..].as_ptr().cast()) };
        let len = rec.Length as usize;
        if len < header || offset + len > buf.len() {
            break;
        }
        let raw = &buf[offset..offset + len];

        let (source, _) = wide_cstr(&raw[header..]);
        let mut strings = Vec::with_capacity(rec.NumStrings as usize);
        let mut pos = rec.StringOffset as usize;
        for _ in 0..rec.NumStrings {
            if pos >= raw.len() {
                break;
            }
            let (value, consumed) = wide_cstr(&raw[pos..]);
            strings.push(value);
            pos += consumed;
        }

        out.push(NativeRecord {
            source,
            event_id: rec.EventID & 0xFFFF,
            event_type: rec.EventType,
            time_generated: i64::from(rec.TimeGenerated),
            strings,
        });
        offset += len;
    }
}

/// NUL-terminated UTF-16LE string and the bytes it occupied.
fn wide_cstr(bytes: &[u8]) -> (String, usize) {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect();
    let consumed = ((units.len() + 1) * 2).min(bytes.len());
    (String::from_utf16_lossy(&units), consumed)
}
