// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::classifier::{category_for_benefit, guess_category};
use crate::utils::required;
use anyhow::Result;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("guess", sub)) => {
            let merchant = required(sub, "merchant")?;
            match guess_category(merchant) {
                Some(c) => println!("{}", c),
                None => println!("No category matches '{}'", merchant),
            }
        }
        Some(("benefit", sub)) => {
            let name = required(sub, "name")?;
            println!("{}", category_for_benefit(name));
        }
        _ => {}
    }
    Ok(())
}
