pub mod fitts_sequence;
pub mod loop_scenarios;
pub mod plant_response;

use pursuit_common::config::ExperimentConfig;

/// Config pointing at an unused ephemeral destination port with a fixed
/// seed, so runs are reproducible and stray listeners are impossible.
pub fn test_config() -> ExperimentConfig {
    let sock = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    let port = sock.local_addr().unwrap().port();
    drop(sock);
    ExperimentConfig {
        viewer_port: port,
        seed: Some(20240117),
        ..Default::default()
    }
}
