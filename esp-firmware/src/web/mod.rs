// Web-Modul: statische Webseite für den Farbwähler
//
// Die Seite lädt die aktuelle Farbe über GET /color und speichert
// die Auswahl per POST /color (form-encoded r, g, b).

// HTML-Datei zur Compile-Zeit einbinden
// Die Datei wird direkt ins Binary eingebettet
pub const INDEX_HTML: &str = include_str!("index.html");
