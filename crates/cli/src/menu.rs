//! Main menu entries.

use core::str::FromStr;

pub const MENU_TEXT: &str = "\
=== Main menu ===
1. Show all products
2. Show expired products
3. Add product
4. Remove product
5. Save
0. Exit";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    ListAll,
    ListExpired,
    Add,
    Remove,
    Save,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::ListAll),
            "2" => Ok(MenuChoice::ListExpired),
            "3" => Ok(MenuChoice::Add),
            "4" => Ok(MenuChoice::Remove),
            "5" => Ok(MenuChoice::Save),
            "0" => Ok(MenuChoice::Exit),
            other => Err(other.to_string()),
        }
    }
}
