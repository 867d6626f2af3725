use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use ssreq_core::protocol::{SetupPacket, setup::setup_words};

const ALL_LANES: u64 = 0b1111;

const REQUEST_TYPE_STANDARD_OUT: u8 = 0x00;
const REQUEST_TYPE_VENDOR_OUT: u8 = 0x40;
const REQUEST_TYPE_VENDOR_IN: u8 = 0xc0;

const SET_ADDRESS: u8 = 0x05;
const SET_CONFIGURATION: u8 = 0x09;
const VENDOR_REQUEST: u8 = 0x01;

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/golden");
    write_enumeration_fixture(&root)?;
    write_data_stall_fixture(&root)?;
    write_stall_precedence_fixture(&root)?;
    Ok(())
}

/// SET_ADDRESS, a stalled vendor IN request, a SET_CONFIGURATION rejected by
/// its verdict and then retried successfully.
fn write_enumeration_fixture(root: &Path) -> Result<(), String> {
    enumeration_trace()?.write(&root.join("enumeration").join("input.jsonl"))
}

/// The enumeration trace again, replayed with a stall handler registered
/// after the device-state handler so its stalls take the handshake group.
fn write_stall_precedence_fixture(root: &Path) -> Result<(), String> {
    let dir = root.join("stall_precedence");
    enumeration_trace()?.write(&dir.join("input.jsonl"))?;

    let config = json!({
        "handlers": [
            {"kind": "device_state"},
            {"kind": "stall_only", "stall_when": {"rule": "always"}}
        ]
    });
    fs::write(dir.join("config.json"), format!("{}\n", config))
        .map_err(|err| format!("failed to write config: {}", err))
}

fn enumeration_trace() -> Result<Trace, String> {
    let set_address = Request::new(REQUEST_TYPE_STANDARD_OUT, SET_ADDRESS, 0x12, 0, 0)?;
    let vendor_in = Request::new(REQUEST_TYPE_VENDOR_IN, VENDOR_REQUEST, 0, 0, 0x40)?;
    let set_config = Request::new(REQUEST_TYPE_STANDARD_OUT, SET_CONFIGURATION, 1, 0, 0)?;

    let mut trace = Trace::default();
    trace.setup(set_address).verdict("rx_good").idle().event("status_requested");
    trace.setup(vendor_in).verdict("rx_good").event("data_requested");
    trace.setup(set_config).verdict("rx_bad");
    trace.setup(set_config).verdict("rx_good").event("status_requested");
    Ok(trace)
}

/// A vendor OUT request whose data stage nobody claims, followed by three
/// setup packets that never validate.
fn write_data_stall_fixture(root: &Path) -> Result<(), String> {
    let vendor_out = Request::new(REQUEST_TYPE_VENDOR_OUT, VENDOR_REQUEST, 0, 0, 8)?;
    let set_address = Request::new(REQUEST_TYPE_STANDARD_OUT, SET_ADDRESS, 0x12, 0, 0)?;
    let (word0, _) = set_address.words;

    let mut trace = Trace::default();
    trace.setup(vendor_out).verdict("rx_good");
    trace.data(&[0x1122_3344, 0x5566_7788]).verdict("rx_good");
    trace.setup_word(word0, true, false).setup_word(0, false, false);
    trace.setup_word(word0, true, false).verdict("rx_bad");
    trace.setup(set_address).verdict("rx_bad");
    trace.event("status_requested");
    trace.write(&root.join("data_stall").join("input.jsonl"))
}

/// The two stream words carrying a control request, split by `setup_words`.
#[derive(Clone, Copy)]
struct Request {
    words: (u32, u32),
}

impl Request {
    fn new(
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        length: u16,
    ) -> Result<Self, String> {
        let packet = SetupPacket {
            request_type,
            request,
            value,
            index,
            length,
            received: false,
        };
        let words = setup_words(&packet.to_bytes())
            .map_err(|err| format!("cannot encode request {:#04x}: {}", request, err))?;
        Ok(Self { words })
    }
}

#[derive(Default)]
struct Trace {
    lines: Vec<String>,
}

impl Trace {
    fn setup(&mut self, request: Request) -> &mut Self {
        let (word0, word1) = request.words;
        self.setup_word(word0, true, false).setup_word(word1, false, true)
    }

    fn setup_word(&mut self, data: u32, first: bool, last: bool) -> &mut Self {
        let mut step = word(data, first, last);
        step.insert("setup".to_string(), Value::Bool(true));
        self.push(step)
    }

    fn data(&mut self, words: &[u32]) -> &mut Self {
        for (i, data) in words.iter().enumerate() {
            self.push(word(*data, i == 0, i + 1 == words.len()));
        }
        self
    }

    fn verdict(&mut self, strobe: &str) -> &mut Self {
        self.event(strobe)
    }

    fn event(&mut self, strobe: &str) -> &mut Self {
        let mut step = Map::new();
        step.insert(strobe.to_string(), Value::Bool(true));
        self.push(step)
    }

    fn idle(&mut self) -> &mut Self {
        self.push(Map::new())
    }

    fn push(&mut self, step: Map<String, Value>) -> &mut Self {
        self.lines.push(Value::Object(step).to_string());
        self
    }

    fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create {}: {}", parent.display(), err))?;
        }
        let mut text = self.lines.join("\n");
        text.push('\n');
        fs::write(path, text).map_err(|err| format!("failed to write {}: {}", path.display(), err))
    }
}

fn word(data: u32, first: bool, last: bool) -> Map<String, Value> {
    let mut step = Map::new();
    step.insert("valid".to_string(), Value::from(ALL_LANES));
    step.insert("data".to_string(), Value::from(data));
    if first {
        step.insert("first".to_string(), Value::Bool(true));
    }
    if last {
        step.insert("last".to_string(), Value::Bool(true));
    }
    step
}
