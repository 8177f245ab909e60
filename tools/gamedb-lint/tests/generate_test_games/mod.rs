//! Fixture database generator for integration tests.

use std::path::{Path, PathBuf};

/// Config with small image sizes so fixtures stay tiny.
pub const CONFIG_TOML: &str = r#"
root = "games"
regions = ["USA", "Europe", "Japan"]

[boxart]
filename = "boxart.png"
width = 8
height = 6

[icon]
filename = "icon.png"
width = 4
height = 4

[screenshots]
dirname = "screenshots"
width = 10
height = 12

[saves]
dirname = "savefiles"
"#;

pub const GAME_DAT: &str = r#"
title = "Example Quest"
description = "An example game."
github_issues = [1234]
needs_system_files = false
needs_shared_font = false

[[releases]]
title = "0004000000012345"
region = "USA"
release_date = "2015-02-13"

[[testcases]]
compatibility = "1"
date = "2018-06-01"
version = "HEAD-1a2b3c4"
author = "tester"
"#;

pub const SAVE_DAT: &str = r#"
title = "Slot 1"
description = "Before the final boss"
author = "tester"
title_id = "0004000000012345"
"#;

/// Write `gamedb.toml` into `dir` and return its path.
pub fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("gamedb.toml");
    std::fs::write(&path, CONFIG_TOML).expect("Failed to write config");
    std::fs::create_dir_all(dir.join("games")).expect("Failed to create games dir");
    path
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x * 20) as u8, (y * 20) as u8, 128, 255])
    })
    .save(path)
    .expect("Failed to write PNG");
}

/// Create a game folder that passes every check, including screenshots and a save.
pub fn write_valid_game(games: &Path, name: &str) -> PathBuf {
    let dir = games.join(name);
    std::fs::create_dir_all(dir.join("screenshots")).expect("Failed to create game dir");
    std::fs::create_dir_all(dir.join("savefiles")).expect("Failed to create saves dir");

    write_png(&dir.join("boxart.png"), 8, 6);
    write_png(&dir.join("icon.png"), 4, 4);
    write_png(&dir.join("screenshots/title.png"), 10, 12);
    std::fs::write(dir.join("game.dat"), GAME_DAT).expect("Failed to write game.dat");
    std::fs::write(dir.join("savefiles/slot1.dat"), SAVE_DAT).expect("Failed to write save");
    std::fs::write(dir.join("savefiles/slot1.zip"), b"PK\x03\x04\x14\x00\x00\x00")
        .expect("Failed to write archive");

    dir
}
