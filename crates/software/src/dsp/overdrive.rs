use super::Insert;
use crate::parameters::Parameters;

/// Two-stage soft clipper.
///
/// Drive sets both the gain into the first clipper and a compensating gain into the second, so loudness stays roughly
/// level across the range. At zero drive the input gain is zero too, which mutes the stage entirely.
#[derive(Debug, Clone)]
pub struct Overdrive {
    pre_gain: f32,
    post_gain: f32,
}

impl Default for Overdrive {
    fn default() -> Self {
        let mut overdrive = Self {
            pre_gain: 0.0,
            post_gain: 0.0,
        };
        overdrive.set_drive(0.5);
        overdrive
    }
}

impl Overdrive {
    /// Constructs an overdrive at half drive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the drive in [0, 1].
    pub fn set_drive(&mut self, drive: f32) {
        let drive = 2.0 * drive.clamp(0.0, 1.0);
        let drive_2 = drive * drive;
        let gentle = drive * 0.5;
        let hard = drive_2 * drive_2 * drive * 24.0;
        self.pre_gain = gentle + (hard - gentle) * drive_2;

        let squashed = drive * (2.0 - drive);
        self.post_gain = 1.0 / soft_clip(0.33 + squashed * (self.pre_gain - 0.33));
    }
}

/// Rational approximation of `tanh`, saturating at ±1 beyond ±3.
fn soft_clip(x: f32) -> f32 {
    if x < -3.0 {
        -1.0
    } else if x > 3.0 {
        1.0
    } else {
        x * (27.0 + x * x) / (27.0 + 9.0 * x * x)
    }
}

impl Insert for Overdrive {
    fn configure(&mut self, parameters: &Parameters) {
        self.set_drive(parameters.drive_amount);
    }

    fn process_sample(&mut self, input: f32) -> f32 {
        soft_clip(soft_clip(input * self.pre_gain) * self.post_gain)
    }
}
