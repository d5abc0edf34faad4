//! Traffic Generator
//!
//! Produces labeled synthetic traffic: normal background plus the three
//! anomaly archetypes. The generator owns its RNG, so a seeded instance is
//! fully reproducible and instances never share state.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::config::{AnomalyKind, AnomalyMix, GeneratorConfig, DDOS_PROTOCOLS, EXFIL_PROTOCOLS};
use crate::constants::{
    EPHEMERAL_PORT_MAX, EPHEMERAL_PORT_MIN, EXFIL_HTTPS_PROBABILITY, EXFIL_MAX_PACKET_SIZE,
    EXFIL_MIN_PACKET_SIZE, MAX_PACKET_SIZE, MIN_PACKET_SIZE, PORT_SCAN_MAX_START,
    PROBE_PACKET_SIZE,
};
use crate::error::CoreResult;
use crate::logic::traffic::{Protocol, Timestamp, TrafficRecord, TrafficSet};

pub struct TrafficGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    clock: DateTime<Utc>,
}

impl TrafficGenerator {
    /// Generator seeded from OS entropy
    pub fn new(config: GeneratorConfig) -> CoreResult<Self> {
        Self::with_rng(config, StdRng::from_entropy(), false)
    }

    /// Reproducible generator
    pub fn seeded(config: GeneratorConfig, seed: u64) -> CoreResult<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed), true)
    }

    /// Seeded when `seed` is given, entropy otherwise
    pub fn from_seed(config: GeneratorConfig, seed: Option<u64>) -> CoreResult<Self> {
        match seed {
            Some(seed) => Self::seeded(config, seed),
            None => Self::new(config),
        }
    }

    fn with_rng(config: GeneratorConfig, rng: StdRng, seeded: bool) -> CoreResult<Self> {
        config.validate()?;
        let clock = config.start_for(seeded);
        Ok(Self { config, rng, clock })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    // ========================================================================
    // MIXED DATASETS
    // ========================================================================

    /// Normal traffic plus `anomaly_count` anomalies split by `mix`, shuffled.
    ///
    /// Anomaly shares are rounded down per archetype (see
    /// [`AnomalyMix::allocate`]), so the anomaly total can fall short of
    /// `anomaly_count`.
    pub fn generate(&mut self, normal_count: usize, anomaly_count: usize, mix: AnomalyMix) -> TrafficSet {
        let mut records = self.normal(normal_count).into_records();

        for (kind, count) in mix.allocate(anomaly_count) {
            let batch = match kind {
                AnomalyKind::PortScan => self.port_scan(count, None),
                AnomalyKind::Ddos => self.ddos(count),
                AnomalyKind::DataExfiltration => self.data_exfiltration(count),
            };
            records.extend(batch.into_records());
        }

        records.shuffle(&mut self.rng);

        log::debug!(
            "Generated {} records ({} normal requested, {} anomalies requested)",
            records.len(),
            normal_count,
            anomaly_count
        );

        records.into()
    }

    /// Even split of anomalies across the three archetypes
    pub fn generate_mixed(&mut self, normal_count: usize, anomaly_count: usize) -> TrafficSet {
        self.generate(normal_count, anomaly_count, AnomalyMix::even())
    }

    /// Exactly `total` records, about `anomaly_ratio` of them anomalous.
    ///
    /// Whatever the even split drops is made up with normal traffic.
    pub fn sample(&mut self, total: usize, anomaly_ratio: f64) -> TrafficSet {
        let ratio = anomaly_ratio.clamp(0.0, 1.0);
        let requested = ((total as f64) * ratio).round() as usize;
        let anomalies: usize = AnomalyMix::even()
            .allocate(requested)
            .iter()
            .map(|(_, count)| count)
            .sum();
        self.generate_mixed(total - anomalies, anomalies)
    }

    // ========================================================================
    // NORMAL TRAFFIC
    // ========================================================================

    pub fn normal(&mut self, count: usize) -> TrafficSet {
        (0..count).map(|_| self.normal_record()).collect()
    }

    fn normal_record(&mut self) -> TrafficRecord {
        let source = pick(&self.config.internal_ips, &mut self.rng);

        let destination = if self.rng.gen_bool(self.config.external_probability) {
            pick(&self.config.external_ips, &mut self.rng)
        } else {
            let peers: Vec<&String> = self
                .config
                .internal_ips
                .iter()
                .filter(|ip| **ip != source)
                .collect();
            match peers.choose(&mut self.rng) {
                Some(peer) => (*peer).clone(),
                None => pick(&self.config.external_ips, &mut self.rng),
            }
        };

        let protocol = self
            .config
            .protocols
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_default();
        let port = match protocol.implied_port() {
            Some(port) => port,
            None => self.config.common_ports.choose(&mut self.rng).copied().unwrap_or(80),
        };

        let (lo, hi) = self.config.packet_size_range;
        let size = self.rng.gen_range(lo..=hi);

        self.record(source, destination, protocol, port, size, false)
    }

    // ========================================================================
    // ANOMALY ARCHETYPES
    // ========================================================================

    /// One attacker probing a contiguous port run on one internal target.
    ///
    /// The run starts at `start_port` (random in 1..=1000 when `None`) and is
    /// truncated at port 65535.
    pub fn port_scan(&mut self, count: usize, start_port: Option<u16>) -> TrafficSet {
        let attacker = self.pick_attacker();
        let target = pick(&self.config.internal_ips, &mut self.rng);
        let start = start_port.unwrap_or_else(|| self.rng.gen_range(1..=PORT_SCAN_MAX_START));

        (0..count)
            .map_while(|offset| u16::try_from(start as usize + offset).ok())
            .map(|port| {
                self.record(
                    attacker.clone(),
                    target.clone(),
                    Protocol::Tcp,
                    port,
                    PROBE_PACKET_SIZE,
                    true,
                )
            })
            .collect()
    }

    /// Many sources flooding one (target, port) pair
    pub fn ddos(&mut self, count: usize) -> TrafficSet {
        let target = pick(&self.config.internal_ips, &mut self.rng);
        let target_port = self.config.common_ports.choose(&mut self.rng).copied().unwrap_or(80);

        (0..count)
            .map(|_| {
                let attacker = self.pick_attacker();
                let protocol = DDOS_PROTOCOLS.choose(&mut self.rng).cloned().unwrap_or_default();
                let size = self.rng.gen_range(MIN_PACKET_SIZE..=MAX_PACKET_SIZE);
                self.record(attacker, target.clone(), protocol, target_port, size, true)
            })
            .collect()
    }

    /// One internal host shipping large payloads to one malicious sink
    pub fn data_exfiltration(&mut self, count: usize) -> TrafficSet {
        let insider = pick(&self.config.internal_ips, &mut self.rng);
        let sink = pick(&self.config.malicious_ips, &mut self.rng);

        (0..count)
            .map(|_| {
                let protocol = EXFIL_PROTOCOLS.choose(&mut self.rng).cloned().unwrap_or_default();
                let port = if self.rng.gen_bool(EXFIL_HTTPS_PROBABILITY) { 443 } else { 53 };
                let size = self.rng.gen_range(EXFIL_MIN_PACKET_SIZE..=EXFIL_MAX_PACKET_SIZE);
                self.record(insider.clone(), sink.clone(), protocol, port, size, true)
            })
            .collect()
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn pick_attacker(&mut self) -> String {
        let pool_len = self.config.external_ips.len() + self.config.malicious_ips.len();
        let index = self.rng.gen_range(0..pool_len);
        if index < self.config.external_ips.len() {
            self.config.external_ips[index].clone()
        } else {
            self.config.malicious_ips[index - self.config.external_ips.len()].clone()
        }
    }

    fn next_timestamp(&mut self) -> Timestamp {
        let step = self.rng.gen_range(1..=self.config.max_jitter_ms);
        self.clock += Duration::milliseconds(step);
        Timestamp::Wall(self.clock)
    }

    fn record(
        &mut self,
        source: String,
        destination: String,
        protocol: Protocol,
        port: u16,
        packet_size: u32,
        is_anomaly: bool,
    ) -> TrafficRecord {
        let source_port = self.rng.gen_range(EPHEMERAL_PORT_MIN..=EPHEMERAL_PORT_MAX);
        let timestamp = self.next_timestamp();
        TrafficRecord::new(source, destination, protocol, port)
            .with_source_port(source_port)
            .with_packet_size(packet_size)
            .with_timestamp(timestamp)
            .with_label(is_anomaly)
    }
}

fn pick(pool: &[String], rng: &mut StdRng) -> String {
    pool.choose(rng).cloned().unwrap_or_default()
}
