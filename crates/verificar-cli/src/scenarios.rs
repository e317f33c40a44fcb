//! Built-in verification scenarios for the wasteland client.
//!
//! One scenario per flow we eyeball during development: the character
//! creation form, the cataclysm visualizer, the biome canvas, and the
//! delta-based initial world load. All screenshots land under
//! `verification/` next to the working directory.

use verificar::{Artifact, Check, Scenario, Step, Target};

/// All built-in scenarios, in the order they run
#[must_use]
pub fn builtin() -> Vec<Scenario> {
    vec![
        character_creator(),
        creator_flow(),
        emoji_input(),
        cataclysm_demo(),
        biome_canvas(),
        delta_load(),
    ]
}

fn character_creator() -> Scenario {
    Scenario::new("character-creator")
        .with_description("Drive the character creation form and capture the preview")
        .navigate("http://localhost:5173/create-character")
        .wait_for_text("Create Your Survivor")
        .click(Target::text("Tech Shaman"))
        .fill(
            Target::placeholder("Enter your wasteland name..."),
            "Jules the Shaman",
        )
        .wait_for_selector(".character-preview-avatar")
        // the emoji service has rendered once an svg shows up in the preview
        .step(Step::WaitForSelector {
            selector: ".character-preview-avatar svg".to_string(),
            timeout_ms: 5_000,
        })
        .check(Check::VisibleByRole {
            role: "heading".to_string(),
            name: "Create Your Survivor".to_string(),
            timeout_ms: 10_000,
        })
        .check(Check::VisibleByRole {
            role: "heading".to_string(),
            name: "Tech Shaman".to_string(),
            timeout_ms: 5_000,
        })
        .screenshot("verification/character_creator.png")
        .artifact(Artifact::console_log(
            "verification/character_creator.console.log",
        ))
}

fn creator_flow() -> Scenario {
    Scenario::new("creator-flow")
        .with_description("Create a survivor end to end and land on the game canvas")
        .navigate("http://localhost:5173/create-character")
        .wait_for_selector(".character-creator")
        .fill(Target::css("input[type=\"text\"]"), "Jules")
        .click(Target::css(".class-card:first-child"))
        .click(Target::text("Enter the Wasteland"))
        .wait_for_selector(".game-canvas")
        .screenshot("verification/creator_flow.png")
}

fn emoji_input() -> Scenario {
    Scenario::new("emoji-input")
        .with_description("Multi-codepoint emoji entry in the creation form")
        .navigate("http://localhost:5173/create-character")
        .fill(Target::placeholder("Enter your character name"), "Test Player")
        .fill(Target::placeholder("Type emoji here..."), "👮🏾\u{200d}♂\u{fe0f}")
        .artifact(Artifact::page_html("verification/emoji_input.html"))
        .screenshot("verification/emoji_input.png")
}

fn cataclysm_demo() -> Scenario {
    Scenario::new("cataclysm-demo")
        .with_description("Trigger a cataclysm and wait for the phase change")
        .navigate("http://localhost:5173/cataclysm-demo")
        .click(Target::role("button", "Start Cataclysm"))
        .check(Check::VisibleByText {
            text: "Phase:cataclysm".to_string(),
            timeout_ms: 10_000,
        })
        .screenshot("verification/cataclysm.png")
}

fn biome_canvas() -> Scenario {
    Scenario::new("biome-canvas")
        .with_description("Wait for the world canvas and let textures settle")
        .navigate("http://localhost:5174/")
        .step(Step::WaitForSelector {
            selector: "canvas".to_string(),
            timeout_ms: 30_000,
        })
        .wait_fixed(5_000)
        .check(Check::VisibleBySelector {
            selector: "canvas".to_string(),
            timeout_ms: 30_000,
        })
        .screenshot("verification/biomes.png")
}

fn delta_load() -> Scenario {
    Scenario::new("delta-load")
        .with_description("Initial world load with the devtools key pressed")
        .navigate("http://localhost:5174/")
        .press_key("F12")
        .screenshot("verification/delta_load.png")
        .artifact(Artifact::console_log("verification/delta_load.console.log"))
}
