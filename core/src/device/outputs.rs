//! Fire-and-forget output sinks: lamps, LEDs, coin counters, sample triggers
//! and mixer levels.
//!
//! The panel remembers the last level of each output and queues an event
//! whenever a level changes (samples always queue, they are one-shots). The
//! host drains the queue with [`OutputPanel::take_events`].

pub const MAX_LAMPS: usize = 32;
pub const MAX_LEDS: usize = 4;
pub const MAX_COIN_COUNTERS: usize = 4;
pub const MAX_SOUND_CHANNELS: usize = 16;

#[derive(Clone, Debug, PartialEq)]
pub enum OutputEvent {
    Lamp { index: usize, on: bool },
    Led { index: usize, on: bool },
    CoinCounter { index: usize, on: bool },
    Sample { channel: usize, sample: usize },
    Volume { channel: usize, level: f32 },
    /// Output gain of one of the custom sound chips.
    SoundGain { chip: usize, level: f32 },
    SpeechGain { level: f32 },
}

pub struct OutputPanel {
    lamps: [bool; MAX_LAMPS],
    leds: [bool; MAX_LEDS],
    counters: [bool; MAX_COIN_COUNTERS],
    coin_counts: [u32; MAX_COIN_COUNTERS],
    volumes: [f32; MAX_SOUND_CHANNELS],
    events: Vec<OutputEvent>,
}

impl OutputPanel {
    pub fn new() -> Self {
        Self {
            lamps: [false; MAX_LAMPS],
            leds: [false; MAX_LEDS],
            counters: [false; MAX_COIN_COUNTERS],
            coin_counts: [0; MAX_COIN_COUNTERS],
            volumes: [1.0; MAX_SOUND_CHANNELS],
            events: Vec::new(),
        }
    }

    pub fn set_lamp(&mut self, index: usize, on: bool) {
        if let Some(lamp) = self.lamps.get_mut(index)
            && *lamp != on
        {
            *lamp = on;
            self.events.push(OutputEvent::Lamp { index, on });
        }
    }

    pub fn set_led(&mut self, index: usize, on: bool) {
        if let Some(led) = self.leds.get_mut(index)
            && *led != on
        {
            *led = on;
            self.events.push(OutputEvent::Led { index, on });
        }
    }

    /// Drive a coin counter solenoid. Each 0 -> 1 edge counts one coin.
    pub fn set_coin_counter(&mut self, index: usize, on: bool) {
        let Some(level) = self.counters.get_mut(index) else {
            return;
        };
        if *level == on {
            return;
        }
        if on {
            self.coin_counts[index] += 1;
        }
        *level = on;
        self.events.push(OutputEvent::CoinCounter { index, on });
    }

    pub fn trigger_sample(&mut self, channel: usize, sample: usize) {
        self.events.push(OutputEvent::Sample { channel, sample });
    }

    pub fn set_volume(&mut self, channel: usize, level: f32) {
        if let Some(v) = self.volumes.get_mut(channel)
            && *v != level
        {
            *v = level;
            self.events.push(OutputEvent::Volume { channel, level });
        }
    }

    pub fn set_sound_gain(&mut self, chip: usize, level: f32) {
        self.events.push(OutputEvent::SoundGain { chip, level });
    }

    pub fn set_speech_gain(&mut self, level: f32) {
        self.events.push(OutputEvent::SpeechGain { level });
    }

    pub fn lamp(&self, index: usize) -> bool {
        self.lamps.get(index).copied().unwrap_or(false)
    }

    pub fn led(&self, index: usize) -> bool {
        self.leds.get(index).copied().unwrap_or(false)
    }

    pub fn coin_counter(&self, index: usize) -> bool {
        self.counters.get(index).copied().unwrap_or(false)
    }

    /// Number of coins counted on a counter since power-on.
    pub fn coin_count(&self, index: usize) -> u32 {
        self.coin_counts.get(index).copied().unwrap_or(0)
    }

    pub fn volume(&self, channel: usize) -> f32 {
        self.volumes.get(channel).copied().unwrap_or(0.0)
    }

    /// Drain queued events in emission order.
    pub fn take_events(&mut self) -> Vec<OutputEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for OutputPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lamp_events_only_on_change() {
        let mut panel = OutputPanel::new();
        panel.set_lamp(3, true);
        panel.set_lamp(3, true);
        panel.set_lamp(3, false);
        assert_eq!(
            panel.take_events(),
            vec![
                OutputEvent::Lamp { index: 3, on: true },
                OutputEvent::Lamp {
                    index: 3,
                    on: false
                },
            ]
        );
        assert!(panel.take_events().is_empty());
    }

    #[test]
    fn coin_counter_counts_rising_edges() {
        let mut panel = OutputPanel::new();
        for on in [true, true, false, true, false] {
            panel.set_coin_counter(1, on);
        }
        assert_eq!(panel.coin_count(1), 2);
        assert!(!panel.coin_counter(1));
    }

    #[test]
    fn samples_always_queue() {
        let mut panel = OutputPanel::new();
        panel.trigger_sample(1, 1);
        panel.trigger_sample(1, 1);
        assert_eq!(panel.take_events().len(), 2);
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let mut panel = OutputPanel::new();
        panel.set_lamp(MAX_LAMPS, true);
        panel.set_led(MAX_LEDS, true);
        panel.set_coin_counter(MAX_COIN_COUNTERS, true);
        assert!(panel.take_events().is_empty());
        assert!(!panel.lamp(MAX_LAMPS));
    }

    #[test]
    fn volume_starts_full() {
        let mut panel = OutputPanel::new();
        assert_eq!(panel.volume(0), 1.0);
        panel.set_volume(0, 1.0);
        assert!(panel.take_events().is_empty());
        panel.set_volume(0, 0.0);
        assert_eq!(
            panel.take_events(),
            vec![OutputEvent::Volume {
                channel: 0,
                level: 0.0
            }]
        );
    }
}
