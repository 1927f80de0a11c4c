use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};
use crate::clock::Clock;
use crate::config::DetectorConfig;
use crate::detector::FailureDetector;
use crate::error::PhiError;
use crate::phi::{ExponentialPhi, PhiModel};


/// The [DetectorRegistry] holds one [FailureDetector] per monitored process, identified by some
///  application defined key (e.g. a node address), all sharing the same configuration and clock.
///
/// A detector is created when the first heartbeat for a key arrives, and it lives until the
///  application removes the key. The registry has no notion of which processes *should* be
///  monitored - that is up to the application.
pub struct DetectorRegistry<K, P: PhiModel = ExponentialPhi> {
    config: DetectorConfig,
    model: P,
    clock: Arc<dyn Clock>,
    detectors: RwLock<FxHashMap<K, Arc<FailureDetector<P>>>>,
}

impl<K: Eq + Hash + Clone + Debug> DetectorRegistry<K> {
    pub fn new(config: DetectorConfig, clock: Arc<dyn Clock>) -> anyhow::Result<DetectorRegistry<K>> {
        DetectorRegistry::with_model(config, ExponentialPhi, clock)
    }
}

impl<K: Eq + Hash + Clone + Debug, P: PhiModel + Clone> DetectorRegistry<K, P> {
    pub fn with_model(config: DetectorConfig, model: P, clock: Arc<dyn Clock>) -> anyhow::Result<DetectorRegistry<K, P>> {
        config.validate()?;

        Ok(DetectorRegistry {
            config,
            model,
            clock,
            detectors: Default::default(),
        })
    }

    /// Record a heartbeat from `peer` at the registry clock's current time, starting to track the
    ///  peer if it is not tracked yet.
    pub fn heartbeat(&self, peer: &K) -> anyhow::Result<()> {
        let now = self.clock.now_millis();
        self.detector_for(peer)?
            .record_heartbeat(now);
        Ok(())
    }

    /// Current phi for `peer`, `Ok(None)` for peers that are not tracked or have no verdict yet
    pub fn phi(&self, peer: &K) -> Result<Option<f64>, PhiError> {
        let detector = match self.detector(peer) {
            Some(detector) => detector,
            None => return Ok(None),
        };
        detector.phi(self.clock.now_millis())
    }

    /// Phi for all tracked peers, evaluated for the same point in time
    pub fn phi_all(&self) -> Vec<(K, Result<Option<f64>, PhiError>)> {
        let detectors = self.read_detectors()
            .iter()
            .map(|(peer, detector)| (peer.clone(), detector.clone()))
            .collect::<Vec<_>>();

        let now = self.clock.now_millis();
        detectors.into_iter()
            .map(|(peer, detector)| {
                let phi = detector.phi(now);
                if let Err(e) = &phi {
                    warn!("no phi for peer {:?}: {}", peer, e);
                }
                (peer, phi)
            })
            .collect()
    }

    pub fn detector(&self, peer: &K) -> Option<Arc<FailureDetector<P>>> {
        self.read_detectors()
            .get(peer)
            .cloned()
    }

    /// Stop tracking `peer`, returning `true` if it was tracked
    pub fn remove(&self, peer: &K) -> bool {
        let removed = self.write_detectors()
            .remove(peer)
            .is_some();
        if removed {
            debug!("no longer tracking peer {:?}", peer);
        }
        removed
    }

    pub fn contains(&self, peer: &K) -> bool {
        self.read_detectors().contains_key(peer)
    }

    pub fn peers(&self) -> Vec<K> {
        self.read_detectors()
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read_detectors().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn detector_for(&self, peer: &K) -> anyhow::Result<Arc<FailureDetector<P>>> {
        if let Some(detector) = self.detector(peer) {
            return Ok(detector);
        }

        let mut detectors = self.write_detectors();
        // another thread may have registered the peer between the two locks
        if let Some(detector) = detectors.get(peer) {
            return Ok(detector.clone());
        }

        debug!("tracking new peer {:?}", peer);
        let detector = Arc::new(FailureDetector::with_model(&self.config, self.model.clone())?);
        detectors.insert(peer.clone(), detector.clone());
        Ok(detector)
    }

    fn read_detectors(&self) -> RwLockReadGuard<'_, FxHashMap<K, Arc<FailureDetector<P>>>> {
        self.detectors.read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_detectors(&self) -> RwLockWriteGuard<'_, FxHashMap<K, Arc<FailureDetector<P>>>> {
        self.detectors.write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
