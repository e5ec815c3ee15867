//! Standard test fixtures with realistic MIB data.

use snmp_get::{Oid, Value, oid};
use std::collections::BTreeMap;

/// Community the test agent answers to.
pub const COMMUNITY: &str = "public";

/// sysDescr.0 of [`system_mib`].
pub const SYS_DESCR_TEXT: &str = "Linux edge-router 5.10.0 #1 SMP x86_64";

/// Standard system MIB entries (1.3.6.1.2.1.1).
pub fn system_mib() -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();

    data.insert(sys_descr(), Value::OctetString(SYS_DESCR_TEXT.into()));
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 2, 0),
        Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 8072, 3, 2, 10)),
    );
    data.insert(sys_uptime(), Value::TimeTicks(8_640_100));
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 4, 0),
        Value::OctetString("noc@example.net".into()),
    );
    data.insert(sys_name(), Value::OctetString("edge-router".into()));
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 6, 0),
        Value::OctetString("Rack 4, Row B".into()),
    );
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 7, 0), Value::Integer(72));
    // ifPhysAddress.1, binary
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 6, 1),
        Value::OctetString(vec![0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e].into()),
    );

    data
}

/// sysDescr.0
pub fn sys_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
}

/// sysUpTime.0
pub fn sys_uptime() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
}

/// sysName.0
pub fn sys_name() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)
}

/// An OID the agent does not implement.
pub fn nonexistent_oid() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 99, 0)
}
