use paneldue::{
    build_bridge, init_logging, list_ports, load_config, BridgeHandle, ConnectionParams,
    ConsoleInterpreter, HeaterStatusProvider, RealSerialPort, UnattachedHeater, BUILD_DATE,
    VERSION,
};
use std::path::PathBuf;
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("paneldue {} (built {})", VERSION, BUILD_DATE);

    let config = load_config(std::env::args_os().nth(1).map(PathBuf::from))?;
    let params = ConnectionParams::from(&config);

    let link = match RealSerialPort::open(&params) {
        Ok(link) => link,
        Err(e) => {
            tracing::error!("Unable to open {}: {}", params.port, e);
            if let Ok(ports) = list_ports() {
                for port in ports {
                    tracing::info!("  available: {} ({})", port.port_name, port.description);
                }
            }
            return Err(e.into());
        }
    };

    let (interpreter, acknowledgements) = ConsoleInterpreter::new();
    let extruders: Vec<Box<dyn HeaterStatusProvider>> = config
        .extruders
        .iter()
        .enumerate()
        .map(|(index, name)| {
            Box::new(UnattachedHeater::new(name.as_str(), index == 0)) as Box<dyn HeaterStatusProvider>
        })
        .collect();

    let bridge = build_bridge(&config, Box::new(link), Box::new(interpreter), extruders)
        .with_acknowledgements(acknowledgements);
    let handle = BridgeHandle::spawn(bridge, Duration::from_millis(config.poll_interval_ms));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    handle.stop().await
}
