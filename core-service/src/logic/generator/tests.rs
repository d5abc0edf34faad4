//! Integration Tests for the Traffic Generator

use std::collections::HashSet;

use chrono::{TimeZone, Utc};

use super::{AnomalyKind, AnomalyMix, GeneratorConfig, TrafficGenerator};
use crate::constants::SEEDED_EPOCH_SECS;
use crate::logic::traffic::{Protocol, Timestamp};

fn generator(seed: u64) -> TrafficGenerator {
    TrafficGenerator::seeded(GeneratorConfig::default(), seed).unwrap()
}

#[test]
fn test_mixed_dataset_counts() {
    let traffic = generator(7).generate_mixed(100, 30);

    assert_eq!(traffic.len(), 130);
    assert_eq!(traffic.anomaly_count(), 30);
    assert_eq!(traffic.labels().iter().map(|l| *l as usize).sum::<usize>(), 30);
}

/// 31 anomalies over 3 archetypes: 10 each, the extra one is dropped
#[test]
fn test_mixed_dataset_rounds_down() {
    let traffic = generator(7).generate_mixed(100, 31);

    assert_eq!(traffic.len(), 130);
    assert_eq!(traffic.anomaly_count(), 30);
}

#[test]
fn test_sample_exact_size() {
    let mut gen = generator(5);

    let fifty = gen.sample(50, 0.1);
    assert_eq!(fifty.len(), 50);
    assert_eq!(fifty.anomaly_count(), 3);

    let hundred = gen.sample(100, 0.1);
    assert_eq!(hundred.len(), 100);
    assert_eq!(hundred.anomaly_count(), 9);

    assert_eq!(gen.sample(10, 2.0).anomaly_count(), 9);
    assert!(gen.sample(0, 0.5).is_empty());
}

#[test]
fn test_zero_counts_yield_empty_set() {
    let mut gen = generator(1);
    assert!(gen.generate_mixed(0, 0).is_empty());
    assert!(gen.normal(0).is_empty());
    assert!(gen.port_scan(0, None).is_empty());
    assert!(gen.ddos(0).is_empty());
    assert!(gen.data_exfiltration(0).is_empty());
}

#[test]
fn test_same_seed_same_traffic() {
    let config = GeneratorConfig::default();
    let a = TrafficGenerator::seeded(config.clone(), 99).unwrap().generate_mixed(40, 9);
    let b = TrafficGenerator::seeded(config, 99).unwrap().generate_mixed(40, 9);
    assert_eq!(a, b);
}

/// Separately built configs must not leak the wall clock into seeded output
#[test]
fn test_seeded_output_independent_of_wall_clock() {
    let a = TrafficGenerator::seeded(GeneratorConfig::default(), 11).unwrap().sample(20, 0.2);
    std::thread::sleep(std::time::Duration::from_millis(5));
    let b = TrafficGenerator::seeded(GeneratorConfig::default(), 11).unwrap().sample(20, 0.2);
    assert_eq!(a, b);

    let epoch = GeneratorConfig::default().start_for(true);
    assert_eq!(epoch.timestamp(), SEEDED_EPOCH_SECS);
    assert!(a.iter().all(|r| matches!(r.timestamp, Some(Timestamp::Wall(t)) if t > epoch)));
}

#[test]
fn test_explicit_start_time_wins() {
    let start = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();
    let config = GeneratorConfig::default().with_start_time(start);
    assert_eq!(config.start_for(true), start);
    assert_eq!(config.start_for(false), start);
}

#[test]
fn test_shuffle_preserves_label_multiset() {
    let mut gen = generator(3);
    let traffic = gen.generate(50, 12, AnomalyMix::only(AnomalyKind::Ddos));

    let anomalies: Vec<_> = traffic.iter().filter(|r| r.is_labeled_anomaly()).collect();
    assert_eq!(anomalies.len(), 12);
    assert!(anomalies.iter().all(|r| r.packet_size >= 64 && r.packet_size <= 1500));
    assert_eq!(traffic.iter().filter(|r| r.is_anomaly == Some(false)).count(), 50);
}

#[test]
fn test_port_scan_contiguous_run() {
    let scan = generator(11).port_scan(10, Some(200));

    let ports: Vec<u16> = scan.iter().map(|r| r.destination_port).collect();
    assert_eq!(ports, (200..210).collect::<Vec<u16>>());

    let pairs: HashSet<_> = scan
        .iter()
        .map(|r| (r.source_ip.clone(), r.destination_ip.clone()))
        .collect();
    assert_eq!(pairs.len(), 1);
    assert!(scan.iter().all(|r| r.packet_size == 64));
    assert!(scan.iter().all(|r| r.protocol == Protocol::Tcp));
    assert!(scan.iter().all(|r| r.is_labeled_anomaly()));
}

#[test]
fn test_port_scan_truncated_at_max_port() {
    let scan = generator(11).port_scan(10, Some(65530));
    let ports: Vec<u16> = scan.iter().map(|r| r.destination_port).collect();
    assert_eq!(ports, vec![65530, 65531, 65532, 65533, 65534, 65535]);
}

#[test]
fn test_port_scan_random_start() {
    let scan = generator(5).port_scan(10, None);
    let first = scan.get(0).unwrap().destination_port;
    assert!((1..=1000).contains(&first));
    for (i, record) in scan.iter().enumerate() {
        assert_eq!(record.destination_port, first + i as u16);
    }
}

#[test]
fn test_ddos_single_target() {
    let flood = generator(21).ddos(25);

    let targets: HashSet<_> = flood
        .iter()
        .map(|r| (r.destination_ip.clone(), r.destination_port))
        .collect();
    assert_eq!(targets.len(), 1);

    let sources: HashSet<_> = flood.iter().map(|r| r.source_ip.clone()).collect();
    assert!(sources.len() > 1);
    assert!(flood
        .iter()
        .all(|r| matches!(r.protocol, Protocol::Tcp | Protocol::Udp | Protocol::Icmp)));
}

#[test]
fn test_data_exfiltration_shape() {
    let exfil = generator(8).data_exfiltration(30);
    let config = GeneratorConfig::default();

    let pairs: HashSet<_> = exfil
        .iter()
        .map(|r| (r.source_ip.clone(), r.destination_ip.clone()))
        .collect();
    assert_eq!(pairs.len(), 1);

    for record in exfil.iter() {
        assert!(config.internal_ips.contains(&record.source_ip));
        assert!(config.malicious_ips.contains(&record.destination_ip));
        assert!(matches!(record.protocol, Protocol::Http | Protocol::Https | Protocol::Dns));
        assert!(record.destination_port == 443 || record.destination_port == 53);
        assert!((1000..=8000).contains(&record.packet_size));
    }
}

#[test]
fn test_normal_traffic_shape() {
    let config = GeneratorConfig::default();
    let normal = generator(4).normal(200);

    for record in normal.iter() {
        assert!(config.internal_ips.contains(&record.source_ip));
        assert_ne!(record.source_ip, record.destination_ip);
        assert!((64..=1500).contains(&record.packet_size));
        assert!(record.source_port >= 49152);
        match record.protocol {
            Protocol::Http => assert_eq!(record.destination_port, 80),
            Protocol::Https => assert_eq!(record.destination_port, 443),
            _ => assert!(config.common_ports.contains(&record.destination_port)),
        }
        assert_eq!(record.is_anomaly, Some(false));
    }
}

#[test]
fn test_normal_timestamps_monotonic() {
    let normal = generator(4).normal(50);
    let stamps: Vec<Timestamp> = normal.iter().filter_map(|r| r.timestamp).collect();

    assert_eq!(stamps.len(), 50);
    assert!(stamps.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_external_probability_bounds() {
    let all_internal = GeneratorConfig::default().with_external_probability(0.0).unwrap();
    let internal_ips = all_internal.internal_ips.clone();
    let traffic = TrafficGenerator::seeded(all_internal, 2).unwrap().normal(40);

    assert!(traffic.iter().all(|r| internal_ips.contains(&r.destination_ip)));
    assert!(GeneratorConfig::default().with_external_probability(1.5).is_err());
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = GeneratorConfig::default();
    config.internal_ips.truncate(1);
    assert!(TrafficGenerator::seeded(config, 1).is_err());
}
