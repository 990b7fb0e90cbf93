//! OAI-PMH style documents shared by the integration tests.

pub const OAI_NS: &str = "http://www.openarchives.org/OAI/2.0/";
pub const DCTERMS_NS: &str = "http://purl.org/dc/terms/";

/// Two records in the OAI default namespace; only the first has a location.
pub const RECORD_DEFAULT_NAMESPACE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/">
  <responseDate>2016-06-01T10:00:00Z</responseDate>
  <ListRecords>
    <record>
      <header>
        <identifier>2</identifier>
        <datestamp>2016-05-30</datestamp>
      </header>
      <metadata>
        <location>
          <country>the Netherlands</country>
          <city>Amsterdam</city>
        </location>
      </metadata>
    </record>
    <record>
      <header>
        <identifier>1109</identifier>
        <datestamp>2016-05-31</datestamp>
      </header>
      <metadata/>
    </record>
  </ListRecords>
</OAI-PMH>"#;

/// Like [`RECORD_DEFAULT_NAMESPACE`], with two identifiers per record.
pub const RECORD_DEFAULT_NAMESPACE_REPEATABLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/">
  <ListRecords>
    <record>
      <header>
        <identifier>2</identifier>
        <identifier>3</identifier>
      </header>
    </record>
    <record>
      <header>
        <identifier>1109</identifier>
        <identifier>1110</identifier>
      </header>
    </record>
  </ListRecords>
</OAI-PMH>"#;

/// The second record has the identifier `0` and no location.
pub const FILTER_ZERO_VALUES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/">
  <ListRecords>
    <record>
      <header><identifier>2</identifier></header>
      <metadata>
        <location>
          <country>the Netherlands</country>
          <city>Amsterdam</city>
        </location>
      </metadata>
    </record>
    <record>
      <header><identifier>0</identifier></header>
      <metadata>
        <location/>
      </metadata>
    </record>
  </ListRecords>
</OAI-PMH>"#;

/// A Dublin Core title in its own namespace inside an OAI record.
pub const MULTIPLE_NAMESPACES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <ListRecords>
    <record>
      <header><identifier>oai:rijksmuseum:RP-P-1906-2550</identifier></header>
      <metadata>
        <dc xmlns:dcterms="http://purl.org/dc/terms/">
          <dcterms:title>Geruit vlak in een kader (opzetkarton voor postzegels of plaatjes?)</dcterms:title>
          <dcterms:type xsi:type="dcterms:DCMIType">Image</dcterms:type>
        </dc>
      </metadata>
    </record>
  </ListRecords>
</OAI-PMH>"#;

/// One object with three constituents.
pub const MULTIPLE_NESTED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/">
  <ListRecords>
    <record>
      <metadata>
        <object>
          <objectid>3517</objectid>
          <constituents>
            <constituent yeardied="1669">Rembrandt</constituent>
            <constituent yeardied="1884">Johannes Mock</constituent>
            <constituent yeardied="1775">Georg Friedrich Schmidt</constituent>
          </constituents>
        </object>
      </metadata>
    </record>
  </ListRecords>
</OAI-PMH>"#;

/// Two objects, with one and three constituents.
pub const MULTIPLE_NESTED_REPEATABLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/">
  <ListRecords>
    <record>
      <metadata>
        <object>
          <objectid>1</objectid>
          <constituents>
            <constituent yeardied="1669">van Gogh</constituent>
          </constituents>
        </object>
      </metadata>
    </record>
    <record>
      <metadata>
        <object>
          <objectid>3517</objectid>
          <constituents>
            <constituent yeardied="1669">Rembrandt</constituent>
            <constituent yeardied="1884">Johannes Mock</constituent>
            <constituent yeardied="1775">Georg Friedrich Schmidt</constituent>
          </constituents>
        </object>
      </metadata>
    </record>
  </ListRecords>
</OAI-PMH>"#;

/// Plain XML without any namespace.
pub const NO_NAMESPACE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<records>
  <record>
    <title>Test</title>
    <location city="Bangkok"/>
  </record>
</records>"#;
