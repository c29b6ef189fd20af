/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

fn main() {
    env_logger::init();
    if let Err(err) = tchart_bindgen::run_main() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
