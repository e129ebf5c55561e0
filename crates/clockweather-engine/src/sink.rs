//! Effect sink that reports renderer instructions through the log.
//!
//! Stands in for a particle renderer when the engine runs headless.

use std::convert::Infallible;

use clockweather_types::EffectDescriptor;
use clockweather_world::EffectSink;
use tracing::info;

/// Logs every switch-off and switch-on at `info` level.
#[derive(Debug, Default)]
pub struct LogEffectSink {
    active: Vec<(String, EffectDescriptor)>,
}

impl LogEffectSink {
    /// Effects switched on and not switched off since.
    pub fn active(&self) -> &[(String, EffectDescriptor)] {
        &self.active
    }
}

impl EffectSink for LogEffectSink {
    type Error = Infallible;

    fn switch_off(&mut self, effect_id: &str) -> Result<(), Infallible> {
        let before = self.active.len();
        self.active.retain(|(id, _)| id != effect_id);
        if self.active.len() != before {
            info!(effect_id, "Effect off");
        }
        Ok(())
    }

    fn switch_on(&mut self, effect_id: &str, effect: &EffectDescriptor) -> Result<(), Infallible> {
        info!(
            effect_id,
            kind = effect.kind.as_str(),
            density = effect.density,
            speed = effect.speed,
            direction = ?effect.direction,
            "Effect on"
        );
        self.active.push((effect_id.to_owned(), *effect));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clockweather_types::EffectKind;
    use clockweather_world::apply_effects;

    use super::*;

    fn rain() -> EffectDescriptor {
        EffectDescriptor {
            kind: EffectKind::Rain,
            density: 0.5,
            speed: 1.5,
            direction: Some(90),
        }
    }

    #[test]
    fn apply_replaces_previous_effects() {
        let mut sink = LogEffectSink::default();
        apply_effects(&mut sink, &[rain()]);
        assert_eq!(sink.active().len(), 1);

        let summary = apply_effects(&mut sink, &[]);
        assert_eq!(summary.applied, 0);
        assert!(sink.active().is_empty());
    }
}
