use paneldue::{
    build_bridge, load_config, ConsoleInterpreter, HeaterStatusProvider, PanelLink,
    UnattachedHeater,
};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct SharedLink {
    written: Arc<Mutex<Vec<u8>>>,
}

impl PanelLink for SharedLink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.written.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }

    fn name(&self) -> String {
        "shared".to_string()
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn framed(seq: i64, payload: &str) -> String {
    let body = format!("N{} {}", seq, payload);
    let sum = body.bytes().fold(0u8, |acc, b| acc ^ b);
    format!("{}*{}\n", body, sum)
}

#[test]
fn test_config_file_drives_bridge() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
serial = "/dev/ttyAMA0"
macros = ["PARK", "HOME"]
extruders = ["extruder", "extruder1"]
machine_name = "Voron"
"#
    )
    .unwrap();

    let config = load_config(Some(file.path().to_path_buf())).unwrap();
    assert_eq!(config.baud, 57600);

    let link = SharedLink::default();
    let (interpreter, _acks) = ConsoleInterpreter::new();
    let extruders: Vec<Box<dyn HeaterStatusProvider>> = config
        .extruders
        .iter()
        .map(|name| Box::new(UnattachedHeater::new(name.as_str(), false)) as Box<dyn HeaterStatusProvider>)
        .collect();
    let mut bridge = build_bridge(&config, Box::new(link.clone()), Box::new(interpreter), extruders);

    bridge.receive(framed(1, "M408 S0").as_bytes());
    bridge.receive(framed(2, "M20 P0:/macros").as_bytes());
    assert_eq!(bridge.run_scheduled_drain(), 2);

    let written = String::from_utf8(link.written.lock().unwrap().clone()).unwrap();
    let frames: Vec<serde_json::Value> = written
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["myName"], "Voron");
    assert_eq!(frames[0]["heaters"].as_array().unwrap().len(), 3);
    assert_eq!(frames[1]["files"], serde_json::json!(["PARK", "HOME"]));
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "baud = 115200").unwrap();

    assert!(load_config(Some(file.path().to_path_buf())).is_err());
}
