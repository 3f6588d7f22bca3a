//! Stepper rows for the phase, light intensity and relief controls

use crate::phase::PhaseControl;
use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stepper {
    Phase,
    Ambient,
    Sun,
    Relief,
}

impl Stepper {
    pub const ALL: [Stepper; 4] = [
        Stepper::Phase,
        Stepper::Ambient,
        Stepper::Sun,
        Stepper::Relief,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stepper::Phase => "Phase",
            Stepper::Ambient => "Ambient",
            Stepper::Sun => "Sun",
            Stepper::Relief => "Relief",
        }
    }

    pub fn command(self, steps: i32) -> ViewerCommand {
        match self {
            Stepper::Phase => ViewerCommand::StepPhase(steps),
            Stepper::Ambient => ViewerCommand::StepAmbient(steps),
            Stepper::Sun => ViewerCommand::StepSun(steps),
            Stepper::Relief => ViewerCommand::StepRelief(steps),
        }
    }

    /// Text shown between the `-` and `+` buttons.
    pub fn label(self, control: &PhaseControl, levels: &LightLevels) -> String {
        match self {
            Stepper::Phase => format!("Phase {:.0}", control.value()),
            Stepper::Ambient => format!("Ambient {:.0}", levels.ambient),
            Stepper::Sun => format!("Sun {:.0}", levels.sun),
            Stepper::Relief => format!("Relief {:.3}", levels.relief),
        }
    }
}

/// A `-` or `+` button of a stepper row.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepperButton {
    pub stepper: Stepper,
    pub steps: i32,
}

/// The value text of a stepper row.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepperLabel(pub Stepper);

pub fn sync_stepper_labels(
    control: Res<PhaseControl>,
    levels: Res<LightLevels>,
    mut initialized: Local<bool>,
    mut labels: Query<(&StepperLabel, &mut Text)>,
) {
    if !*initialized || control.is_changed() || levels.is_changed() {
        *initialized = true;

        for (label, mut text) in &mut labels {
            *text = Text::new(label.0.label(&control, &levels));
        }
    }
}
