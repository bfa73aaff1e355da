// Build-Script für light-sensor-node
// Backt die Deployment-Werte aus .env ein und setzt die Linker-Skripte

/// Variablen, die aus .env bzw. der Umgebung an den Compiler gehen
const FORWARDED_VARS: [&str; 6] = [
    "WIFI_SSID",
    "WIFI_PASSWORD",
    "MQTT_BROKER",
    "MQTT_TOPIC_STATUS",
    "MQTT_TOPIC_CONTROL",
    "MINUTES_BETWEEN",
];

fn main() {
    // Ohne .env müssen die Werte bereits in der Umgebung stehen
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  Keine .env geladen ({e}), nutze Umgebungsvariablen");
    }

    for var in FORWARDED_VARS {
        println!("cargo:rerun-if-env-changed={var}");
        if let Ok(value) = std::env::var(var) {
            println!("cargo:rustc-env={var}={value}");
        }
    }

    // config.rs parst MINUTES_BETWEEN als const, hier mit lesbarer Meldung prüfen
    if let Ok(minutes) = std::env::var("MINUTES_BETWEEN") {
        if minutes.parse::<u64>().is_err() {
            panic!("MINUTES_BETWEEN muss eine positive Ganzzahl sein, ist aber '{minutes}'");
        }
    }

    register_linker_hints();

    println!("cargo:rustc-link-arg=-Tdefmt.x");
    // linkall.x zuletzt
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

/// Hinweistexte für bekannte Linker-Fehler
///
/// Der Linker ruft dieses Build-Script erneut als `--error-handling-script`
/// auf, mit Fehlerart und Symbol als Argumenten.
fn register_linker_hints() {
    let args: Vec<String> = std::env::args().collect();

    if let [_, kind, symbol, ..] = args.as_slice() {
        if kind != "undefined-symbol" {
            std::process::exit(1);
        }
        if let Some(hint) = hint_for_symbol(symbol) {
            eprintln!();
            eprintln!("💡 {hint}");
            eprintln!();
        }
        std::process::exit(0);
    }

    match std::env::current_exe() {
        Ok(exe) => println!(
            "cargo:rustc-link-arg=--error-handling-script={}",
            exe.display()
        ),
        Err(e) => eprintln!("⚠️  Linker-Hinweise nicht registriert: {e}"),
    }
}

fn hint_for_symbol(symbol: &str) -> Option<&'static str> {
    match symbol {
        s if s.starts_with("_defmt_") => Some(
            "`defmt` not found - is `defmt.x` linked and does `esp-println` use `defmt-espflash`?",
        ),
        "_stack_start" => Some("Linker script `linkall.x` is missing"),
        s if s.starts_with("esp_rtos_") => {
            Some("`esp_rtos::start` must run before `esp_radio::init`")
        }
        "free" | "malloc" | "calloc" | "realloc_internal" | "malloc_internal" => {
            Some("The radio needs a heap: add `esp-alloc` and call `heap_allocator!`")
        }
        _ => None,
    }
}
