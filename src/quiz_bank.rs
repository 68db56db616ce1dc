//! Energy-saving quiz questions
//!
//! Static content table. The simulation only stores an index into it.

/// One multiple-choice question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub prompt: &'static str,
    pub options: [&'static str; 4],
    /// Index into `options`
    pub answer: usize,
    pub hint: &'static str,
}

const fn q(
    prompt: &'static str,
    options: [&'static str; 4],
    answer: usize,
    hint: &'static str,
) -> Question {
    Question {
        prompt,
        options,
        answer,
        hint,
    }
}

/// Built-in bank
pub static QUESTIONS: [Question; 30] = [
    q(
        "Which light source is the most economical?",
        ["Incandescent bulb", "Halogen", "LED bulb", "Neon"],
        2,
        "LEDs use less power and last longer.",
    ),
    q(
        "What reduces heat loss in a house?",
        ["Gaps in windows", "Wall insulation", "Thin glass", "A door left ajar"],
        1,
        "Insulation means lower heating bills.",
    ),
    q(
        "What is the most economical way to reach a nearby shop?",
        ["Car", "Taxi", "E-bike", "Plane"],
        2,
        "Short trips are where bikes shine.",
    ),
    q(
        "What cuts water consumption?",
        ["Tap aerator", "A leak", "A full bath", "Removed shower head"],
        0,
        "An aerator mixes water with air.",
    ),
    q(
        "What should you do with a charger once the device is charged?",
        ["Leave it plugged in", "Unplug it", "Hide it under a pillow", "Plug it in again"],
        1,
        "Unplug it: cheaper and safer.",
    ),
    q(
        "Which TV mode is the most economical?",
        ["Demo", "Eco mode", "Max brightness", "Dynamic"],
        1,
        "Eco mode lowers brightness and consumption.",
    ),
    q(
        "What is the best way to do laundry?",
        ["Small loads", "Full loads", "Always hot water", "One item at a time"],
        1,
        "Full loads at low temperatures pay off.",
    ),
    q(
        "At night a laptop is better…",
        ["Left on", "Paused", "Switched off", "At max brightness"],
        2,
        "Switch it off if you won't need it for a while.",
    ),
    q(
        "How can you reduce your carbon footprint?",
        ["Fly more", "Eat less meat", "Buy every new gadget", "Ignore waste"],
        1,
        "Plant-based food is greener.",
    ),
    q(
        "What lowers electricity use?",
        ["Leaving lights on", "Switching lights off", "Raising brightness", "More lamps"],
        1,
        "Switch off what you don't need.",
    ),
    q(
        "How should a room be aired?",
        ["Slightly open for hours", "Wide open, briefly", "Always open", "Never"],
        1,
        "Short, intense airing keeps the heat.",
    ),
    q(
        "How do you save water in the shower?",
        ["Fill the bath", "Remove the head", "Take a short shower", "Wash for ages"],
        2,
        "A short shower saves water and energy.",
    ),
    q(
        "What lowers a PC's energy use?",
        ["Max brightness", "Sleep mode", "A game in the background", "A screensaver"],
        1,
        "Sleep mode saves the most.",
    ),
    q(
        "How do you extend battery life?",
        ["Full discharges", "Partial charges", "Overheating", "Never charging"],
        1,
        "Small top-ups are healthier.",
    ),
    q(
        "What reduces appliance noise?",
        ["A damping mat", "Dust", "High speed", "Overloading"],
        0,
        "Damping cuts noise and vibration.",
    ),
    q(
        "How do you reduce a car's fuel use?",
        ["Hard starts", "Smooth acceleration", "High revs", "Long idling"],
        1,
        "Smooth driving saves fuel.",
    ),
    q(
        "What helps reduce gas used for heating?",
        ["An open door", "Floor insulation", "Thin curtains", "Windows on tilt"],
        1,
        "Insulating floors works.",
    ),
    q(
        "How do you produce less rubbish?",
        ["Burn it at home", "Recycle", "Don't sort", "Throw everything out"],
        1,
        "Sort and hand in your waste.",
    ),
    q(
        "What lowers a fridge's energy use?",
        ["Opening it often", "Cleaning the vents", "Placing it by a radiator", "Overloading the door"],
        1,
        "Clean vents improve efficiency.",
    ),
    q(
        "How do you cut appliance running costs?",
        ["Leave them plugged in", "Keep them on", "Pull the plugs", "Raise the power"],
        2,
        "Unplug devices you aren't using.",
    ),
    q(
        "What saves electricity at night?",
        ["Switching devices off", "Max brightness", "Leaving chargers in", "Turning everything on"],
        0,
        "Switch off completely.",
    ),
    q(
        "How do you use less water in the garden?",
        ["Pour from a bucket", "Drip irrigation", "An open hose", "Water at hot noon"],
        1,
        "Drip irrigation is precise and frugal.",
    ),
    q(
        "What reduces thermal bridges?",
        ["Single glazing", "Double glazing", "Gaps", "No insulation"],
        1,
        "Double glazing keeps the warmth in.",
    ),
    q(
        "How do you use less paper?",
        ["Print double-sided", "Single-sided", "Colour printing", "More pages"],
        0,
        "Duplex printing halves the paper.",
    ),
    q(
        "How do you save petrol?",
        ["Accelerate hard", "Brake smoothly", "Drift", "Warm up for ages"],
        1,
        "Smoothness is the key to economy.",
    ),
    q(
        "What lowers home energy use?",
        ["Air leaks", "Insulation", "Removing seals", "Leaving windows open"],
        1,
        "Insulate walls and joints.",
    ),
    q(
        "How do you extend a lamp's life?",
        ["Flick it often", "Soft start", "Overheating", "Max brightness"],
        1,
        "A soft start reduces stress.",
    ),
    q(
        "What saves energy when cooking?",
        ["Cooking with a lid", "Lid off", "Tiny pans", "Max heat"],
        0,
        "A lid keeps the heat in.",
    ),
    q(
        "How do you cut energy costs in an office?",
        ["Leave PCs on", "Timers and auto-off", "Max backlight", "Work at night"],
        1,
        "Automate switching off.",
    ),
    q(
        "What reduces a washing machine's consumption?",
        ["High temperature", "Half loads", "Frequent washes", "Low temperature"],
        3,
        "Low temperatures save energy.",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_answers_are_in_range() {
        assert_eq!(QUESTIONS.len(), 30);
        for question in QUESTIONS.iter() {
            assert!(question.answer < question.options.len(), "{}", question.prompt);
            assert!(!question.hint.is_empty());
        }
    }
}
