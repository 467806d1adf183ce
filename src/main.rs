use std::env;
use std::error::Error;

use mcusim::{ihex::IhexReader, mcu::avr::{fuses::FREQUENCY_UNKNOWN, init_device, DeviceVariant}};

#[macro_use]
extern crate timeit;

fn describe_frequency(khz: u32) -> String {
    if khz == FREQUENCY_UNKNOWN {
        "unknown clock".to_string()
    } else {
        format!("{} kHz", khz)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let path = args.next().ok_or("usage: mcusim <image.hex> [device]")?;
    let variant = match args.next() {
        Some(name) => name.parse()?,
        None => DeviceVariant::Atmega8a,
    };

    let mut mcu = init_device(variant)?;
    mcu.bind_program_memory(vec![0; mcu.flash_words()])?;

    let mut image = IhexReader::open(&path)?;
    let sec = timeit_loops!(1, {
        mcu.load_program_image(&mut image)?;
    });

    println!(
        "{}: {} loaded in {:.3} ms ({}, boot section at 0x{:03X})",
        mcu.name(),
        path,
        sec * 1000.0,
        describe_frequency(mcu.frequency()),
        mcu.boot_loader().start
    );
    Ok(())
}
